//! Data store error types

use thiserror::Error;

/// Errors that can occur talking to the hosted data store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store could not be reached
    #[error("Data store unavailable")]
    Unavailable,

    /// Request timed out
    #[error("Data store request timeout")]
    Timeout,

    /// HTTP layer failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("Data store error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Insert succeeded but returned no rows
    #[error("Insert returned no rows")]
    EmptyInsert,
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl StoreError {
    /// Map a transport error onto the store taxonomy
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_connect() {
            StoreError::Unavailable
        } else {
            StoreError::Request(err)
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
