//! Error types for the registrar core utilities

use thiserror::Error;

/// Result type for registrar core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading records or configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied data failed validation (missing headers or row data)
    #[error("{0}")]
    Validation(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Uploaded file is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error from any displayable message
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether this error reports bad caller data rather than an internal fault
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
