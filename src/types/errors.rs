//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Tool
//! handlers never return these to their caller; they are caught at the handler
//! boundary and turned into a message. Dispatch contract violations (unknown
//! tool, bad arguments) do surface as errors.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the experiment tools.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid arguments or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown tool or record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Record store failure (unavailable, corrupt fixture, ...).
    #[error("store error: {0}")]
    Store(String),

    /// Exposure query runner failure.
    #[error("query runner error: {0}")]
    Runner(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable error code for the JSON dispatch boundary.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "INVALID_ARGUMENT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Store(_) | Error::Runner(_) => "UNAVAILABLE",
            Error::Internal(_) | Error::Serialization(_) | Error::Io(_) => "INTERNAL",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn runner(msg: impl Into<String>) -> Self {
        Self::Runner(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            Error::store("connection refused").to_string(),
            "store error: connection refused"
        );
        assert_eq!(Error::not_found("x").to_string(), "not found: x");
    }

    #[test]
    fn test_codes() {
        assert_eq!(Error::validation("x").code(), "INVALID_ARGUMENT");
        assert_eq!(Error::not_found("x").code(), "NOT_FOUND");
        assert_eq!(Error::runner("x").code(), "UNAVAILABLE");

        let serde_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(Error::from(serde_err).code(), "INTERNAL");
    }
}
