//! Error types for the Quill execution engine.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum QuillError {
    /// Connection could not be established or re-established
    /// (host unreachable, auth failed, unknown database, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, constraint violations, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// A command was invoked without a required argument.
    /// Fatal to that call only; the session is left unchanged.
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// Configuration errors (bad defaults, malformed descriptor fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl QuillError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a missing-argument error with the given message.
    pub fn missing_argument(msg: impl Into<String>) -> Self {
        Self::MissingArgument(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::MissingArgument(_) => "Missing Argument",
            Self::Config(_) => "Configuration Error",
        }
    }
}

/// Result type alias using `QuillError`.
pub type Result<T> = std::result::Result<T, QuillError>;
