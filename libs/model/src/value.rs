use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single field's value.
///
/// A field holds exactly one of a typed value or a [`FieldValue::Sentinel`]
/// (a reserved raw string meaning "not recorded"); the two are mutually
/// exclusive by construction since they share one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Choice(String),
    /// Selected codes in selection order. The external fan-out
    /// representation (`field___code`) is produced by the codec.
    MultiChoice(Vec<String>),
    Date(NaiveDate),
    Time(NaiveTime),
    Sentinel(String),
}

impl FieldValue {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, FieldValue::Sentinel(_))
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            FieldValue::Choice(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            FieldValue::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_codes(&self) -> Option<&[String]> {
        match self {
            FieldValue::MultiChoice(codes) => Some(codes),
            _ => None,
        }
    }
}
