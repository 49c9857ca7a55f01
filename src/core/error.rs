//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Query-string problems never escape the codec: they are reported as
/// `MalformedFilterValue`, logged, and the field is treated as absent.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from reading a snapshot file.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a snapshot document that is not valid JSON for the data model.
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A query parameter was present but could not be parsed as its expected type.
    #[error("Malformed value {value:?} for filter `{key}`")]
    MalformedFilterValue { key: String, value: String },
}

pub type CoreResult<T> = Result<T, CoreError>;
