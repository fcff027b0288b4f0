//! Parse and render error types.

use starlist_ast::NodeId;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is invalid.
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message.
        message: String,
        /// Byte offset where the error occurred.
        offset: Option<usize>,
    },

    /// The source is too large to be addressed by 32-bit spans.
    #[error("Source too large: {len} bytes")]
    TooLarge { len: usize },
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: None,
        }
    }

    /// Creates a new invalid source error with offset.
    pub fn invalid_source_at(message: impl Into<String>, offset: usize) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: Some(offset),
        }
    }
}

/// Errors that can occur while rendering a tree back to markdown.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A node's span does not address valid text of the source it was
    /// rendered against.
    #[error("Span {start}..{end} is not valid for a source of {len} bytes")]
    InvalidSpan { start: u32, end: u32, len: usize },

    /// A handle that does not belong to the tree was reached.
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
}
