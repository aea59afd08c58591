use async_trait::async_trait;
use rearc_model::FlatRecord;
use thiserror::Error;

/// Failure at the transmission boundary. Never produced by the mapping
/// core itself; always recovered at this layer.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("external service unreachable: {0}")]
    Unreachable(String),

    #[error("external service rejected the record: {0}")]
    Rejected(String),
}

/// Submits one encoded record to the external system.
///
/// The sole async seam of the core. Implementations carry their own
/// authentication and endpoint configuration.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn submit(&self, record: &FlatRecord) -> Result<(), TransportError>;
}
