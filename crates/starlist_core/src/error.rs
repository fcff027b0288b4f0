//! Engine error types.

use starlist_parser::{ParseError, RenderError};
use thiserror::Error;

/// Errors that can occur while processing a list.
#[derive(Debug, Error)]
pub enum StarlistError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The fetched document is not UTF-8.
    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Render error.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The source document could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The rendered document could not be published.
    #[error("Publish error: {0}")]
    Publish(String),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] starlist_cache::CacheError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StarlistError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch(message.into())
    }

    /// Creates a publish error.
    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish(message.into())
    }
}
