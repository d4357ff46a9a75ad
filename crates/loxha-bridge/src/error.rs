//! Bridge error types

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Publish rejected by the bus client; retry/backoff is the client's
    /// concern, this layer only reports it
    #[error("publish failed: {0}")]
    Publish(String),

    #[error(transparent)]
    Core(#[from] loxha_core::Error),
}
