//! GitHub collaborators for starlist.
//!
//! - [`GithubStarsProvider`] reads `stargazerCount` through the GraphQL API
//! - [`ContentsPublisher`] commits rendered lists through the contents API
//! - [`RawDocumentFetcher`] downloads source documents with a size limit
//!
//! All three share one [`GithubClient`], which carries the token and retries
//! transient failures with exponential backoff.

pub mod contents;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod stars;

pub use contents::ContentsPublisher;
pub use error::GithubError;
pub use fetcher::RawDocumentFetcher;
pub use http_client::{GithubClient, GithubClientBuilder};
pub use stars::{GithubStarsProvider, RateLimit};
