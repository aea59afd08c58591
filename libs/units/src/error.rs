use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("field '{0}' has no unit-dependent conversion")]
    NotUnitDependent(String),

    #[error("unit {unit} is not legal for field '{field}'")]
    WrongUnit { field: String, unit: crate::FieldUnit },
}
