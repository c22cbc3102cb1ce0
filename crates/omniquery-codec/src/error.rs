//! Error types for the codecs.
//!
//! Most import problems are not errors: they are collected as warnings on
//! the [`ImportResult`](crate::ImportResult). Errors are reserved for
//! requests that cannot produce a meaningful result at all.

use thiserror::Error;

/// Errors that can occur while encoding or decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("data path '{0}' does not exist in the document")]
    DataPathNotFound(String),

    #[error("data path '{0}' does not point at an array")]
    DataPathNotArray(String),

    #[error("a table name is required for SQL export")]
    MissingTable,

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output buffer error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
