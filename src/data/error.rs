//! Error types for the journal's storage layer.

use thiserror::Error;

/// Failures from the key-value store and the journal built on it
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading failed; callers loading history treat this as "no data"
    #[error("failed to read from storage: {0}")]
    Read(#[source] rusqlite::Error),

    #[error("failed to write to storage: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("failed to open storage at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to encode mood data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid import: {0}")]
    Import(#[from] ImportError),

    #[error("another storage operation is already in progress")]
    Busy,
}

/// Why imported content was rejected
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("content is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("expected a JSON array of entries")]
    NotAnArray,

    #[error("entry {index} is not a valid record: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("entry {index} has an invalid date '{date}' (expected YYYY-MM-DD)")]
    InvalidDate { index: usize, date: String },

    #[error("entry {index} has {metric} = {value}, expected a value between 0 and 1")]
    OutOfRange {
        index: usize,
        metric: &'static str,
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
