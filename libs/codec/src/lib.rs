#![forbid(unsafe_code)]

//! Bidirectional mapping between protocols and the flat external record.
//!
//! The encoder walks the sections in a fixed order and applies, per
//! field, the sentinel registry, the unit conversion table and the
//! checkbox fan-out; the decoder is its inverse, including the one-day
//! date shift. Both directions are pure over their inputs.

mod checkbox;
mod decode;
mod encode;
mod error;
mod registry;

pub use checkbox::{checkbox_spec, fanout_key, CheckboxSpec, Selection};
pub use decode::decode;
pub use encode::encode;
pub use error::{DecodeError, EncodeError};
pub use registry::CrossRefRegistry;
