//! StickVault error types

use thiserror::Error;

/// StickVault error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed import document, malformed stored collection, or an
    /// operation that would violate a data invariant. Detected at the point
    /// of entry, never partially applied.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Index out of range or unknown note id; the operation is a no-op.
    #[error("Bounds error: {0}")]
    Bounds(String),

    /// A cross-context command could not reach a live page context.
    /// Logged, not retried.
    #[error("Delivery failure: {0}")]
    Delivery(String),

    /// The persistence gateway is unavailable.
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for StickVault operations
pub type Result<T> = std::result::Result<T, Error>;
