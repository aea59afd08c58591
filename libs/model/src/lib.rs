#![forbid(unsafe_code)]

//! Data model for cardiac-arrest registry protocols.
//!
//! A [`Protocol`] is one clinical record: a fixed set of named fields grouped
//! into ordered [`SectionId`] sections, each holding a typed [`FieldValue`].
//! The external system stores the same record as a flat string map
//! ([`FlatRecord`]); the field vocabulary, section membership and value kinds
//! are fixed by that system and captured here as static schema tables.

mod codes;
mod flat;
mod protocol;
mod schema;
mod sentinel;
mod value;

pub use codes::choice_codes;
pub use flat::FlatRecord;
pub use protocol::{Protocol, CROSS_REF_SLOTS};
pub use schema::{
    field_kind, field_name, field_section, section_fields, FieldDef, FieldKind, SectionId,
};
pub use sentinel::{companion_field, is_sentinel, sentinels};
pub use value::FieldValue;
