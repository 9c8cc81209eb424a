//! Error types for LazyGrid

use thiserror::Error;

use crate::Field;

/// Core error type for grid operations
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Page size {size} is not one of {allowed:?}")]
    InvalidPageSize { size: usize, allowed: Vec<usize> },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: Field, reason: String },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl GridError {
    pub fn invalid_value(field: Field, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for grid operations
pub type GridResult<T> = std::result::Result<T, GridError>;
