use thiserror::Error;

/// A flat value that cannot be interpreted under the field's type or
/// sentinel contract. Decoding aborts on the first one; nothing is
/// partially written.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("field '{field}': '{raw}' is not a valid number")]
    InvalidNumber { field: String, raw: String },

    #[error("field '{field}': '{raw}' is not a valid date")]
    InvalidDate { field: String, raw: String },

    #[error("field '{field}': '{raw}' is not a valid time")]
    InvalidTime { field: String, raw: String },

    #[error("record id '{0}' is not a valid identifier")]
    InvalidRecordId(String),

    #[error("field '{field}': {source}")]
    Conversion {
        field: String,
        source: rearc_units::Error,
    },
}

/// Encoding fails atomically: the first field that cannot be serialized
/// aborts the whole record.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("field '{field}': {source}")]
    Conversion {
        field: String,
        source: rearc_units::Error,
    },

    #[error("field '{field}': date cannot be shifted")]
    DateOutOfRange { field: String },
}
