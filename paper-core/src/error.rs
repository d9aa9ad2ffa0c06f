//! Error types for canvas boundaries.
//!
//! Canvas mutations never fail; only loading configuration and snapshots can.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur at the edges of the canvas engine.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Snapshot or config serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a config or snapshot file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
