#![forbid(unsafe_code)]

//! Measurement units for the handful of unit-dependent numeric fields.
//!
//! Each institution picks one of exactly two legal units per field (an
//! integer code in an admin-editable table). The external system always
//! stores the canonical unit; conversion happens on decode (canonical →
//! configured display unit) and encode (display → canonical). The
//! conversion factors are direction-specific literals inherited from the
//! registry definition and are deliberately not exact reciprocals of each
//! other; both directions are reproduced verbatim.

mod config;
mod convert;
mod error;

pub use config::{FieldUnit, UnitConfig};
pub use convert::{to_canonical, to_display};
pub use error::{Error, Result};
