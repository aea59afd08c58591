#![forbid(unsafe_code)]

//! Conditional field dependencies for protocol entry.
//!
//! Every field's required/optional/hidden state is driven by the values of
//! its governing fields, declared once in a static rule table and
//! interpreted by one generic engine. The engine takes the institution's
//! unit snapshot as an explicit input, re-evaluates dependents
//! synchronously on every governing edit, and reports failed constraints
//! as per-field data for the UI rather than as errors.

mod engine;
mod rule;
mod state;
mod table;

pub use engine::{Completeness, RuleEngine};
pub use rule::{Constraint, FieldRule, Gate, Requiredness, UnitBounds};
pub use state::{Evaluation, FieldState, FieldStatus, Violation};
pub use table::{ALWAYS_REQUIRED, RULES};
