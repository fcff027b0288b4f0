//! Error types for GitHub access.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the GitHub client and its collaborators.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Network request failed.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http { status: StatusCode, url: String },

    /// The GraphQL endpoint reported errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Repository not found.
    #[error("Repository not found: {0}")]
    NotFound(String),

    /// A star count that cannot be a star count.
    #[error("Invalid star count {count} for {repo}")]
    InvalidCount { repo: String, count: i64 },

    /// Response body exceeds the maximum allowed.
    #[error("Response too large: {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    /// The response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl GithubError {
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl(message.into())
    }

    /// Whether repeating the request may succeed.
    ///
    /// Transport failures, rate limiting and server errors are transient.
    /// Everything else is an answer.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Http { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }
}
