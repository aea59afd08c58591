use rearc_model::{field_section, section_fields, SectionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Activation state of one field, driven by its governing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// Hidden by its gate: not required, not validated, value cleared.
    Inactive,
    ActiveOptional,
    ActiveRequired,
}

/// A single failed constraint on a field.
///
/// Violations are consumed by the UI layer as per-field state. They are
/// never surfaced as errors and never stop an evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    OutOfRange { min: Decimal, max: Decimal },
    DateInFuture,
    DateBefore { reference: &'static str },
    /// The field's date+time lies before the referenced date+time pair.
    TimeNotAfter { date: &'static str, time: &'static str },
    SelectionCount { min: usize, max: usize },
    MissingRequired,
}

/// State plus at most one violation for a field.
///
/// Only the first failed constraint is kept; the operator fixes fields one
/// at a time and the next pass reports the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStatus {
    pub state: FieldState,
    pub violation: Option<Violation>,
}

impl FieldStatus {
    pub fn inactive() -> Self {
        Self {
            state: FieldState::Inactive,
            violation: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }
}

/// Result of a full or incremental rule pass over a protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    statuses: BTreeMap<String, FieldStatus>,
}

impl Evaluation {
    pub fn status(&self, field: &str) -> Option<&FieldStatus> {
        self.statuses.get(field)
    }

    pub fn state(&self, field: &str) -> FieldState {
        self.statuses
            .get(field)
            .map(|s| s.state)
            .unwrap_or(FieldState::ActiveOptional)
    }

    pub(crate) fn put(&mut self, field: &str, status: FieldStatus) {
        self.statuses.insert(field.to_string(), status);
    }

    /// Whether no field carries a violation.
    pub fn is_valid(&self) -> bool {
        self.statuses.values().all(FieldStatus::is_valid)
    }

    pub fn violations(&self) -> impl Iterator<Item = (&str, &Violation)> {
        self.statuses
            .iter()
            .filter_map(|(f, s)| s.violation.as_ref().map(|v| (f.as_str(), v)))
    }

    /// Required fields, in section/form order.
    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        for section in SectionId::ALL {
            for def in section_fields(section) {
                if self.state(def.name) == FieldState::ActiveRequired {
                    out.push(def.name);
                }
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldStatus)> {
        self.statuses
            .iter()
            .filter(|(f, _)| field_section(f).is_some())
            .map(|(f, s)| (f.as_str(), s))
    }
}
