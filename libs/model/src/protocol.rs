use crate::schema::{field_section, SectionId};
use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of external cross-reference slots per protocol.
pub const CROSS_REF_SLOTS: usize = 5;

/// One clinical record.
///
/// Identity (`record_id`) is assigned by the external system before any
/// section data exists; this core only populates, encodes and decodes the
/// record, it never creates or deletes one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub record_id: u32,
    /// Cross-reference numbers ("protnr") to other registries, up to five.
    pub cross_refs: [Option<String>; CROSS_REF_SLOTS],
    /// Field name to value; absent means blank. Field names are globally
    /// unique across sections, so one map suffices.
    values: BTreeMap<String, FieldValue>,
}

impl Protocol {
    pub fn new(record_id: u32) -> Self {
        Self {
            record_id,
            ..Default::default()
        }
    }

    /// Set a typed value, replacing any sentinel held in the same slot.
    ///
    /// Panics in debug builds if the field is not in the schema; unknown
    /// inbound keys are filtered earlier by the decoder.
    pub fn set(&mut self, field: &str, value: FieldValue) {
        debug_assert!(
            field_section(field).is_some(),
            "unknown field {}",
            field
        );
        self.values.insert(field.to_string(), value);
    }

    /// Store a sentinel for `field`, clearing any typed value.
    pub fn set_sentinel(&mut self, field: &str, raw: &str) {
        self.set(field, FieldValue::Sentinel(raw.to_string()));
    }

    /// Clear a field entirely.
    pub fn clear(&mut self, field: &str) {
        self.values.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// The sentinel held by `field`, if any.
    pub fn sentinel(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::Sentinel(raw)) => Some(raw),
            _ => None,
        }
    }

    /// Choice code of `field`, if it holds one.
    pub fn code(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_code)
    }

    /// Whether the field holds anything (typed value or sentinel).
    pub fn is_filled(&self, field: &str) -> bool {
        match self.values.get(field) {
            None => false,
            Some(FieldValue::MultiChoice(codes)) => !codes.is_empty(),
            Some(_) => true,
        }
    }

    /// Fields currently holding a value, with their sections.
    pub fn filled_fields(&self) -> impl Iterator<Item = (SectionId, &str)> {
        self.values.keys().filter_map(|name| {
            field_section(name).map(|section| (section, name.as_str()))
        })
    }
}
