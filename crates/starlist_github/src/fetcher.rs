//! Raw source document fetcher.

use futures_util::StreamExt;
use starlist_core::traits::DocumentFetcher;
use tracing::debug;

use crate::error::GithubError;
use crate::http_client::{GithubClient, check_status};

/// Maximum size for a source document (10MB).
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Downloads source documents, typically from `raw.githubusercontent.com`.
///
/// Requests are sent without the API token.
#[derive(Debug, Clone)]
pub struct RawDocumentFetcher {
    client: GithubClient,
    max_size: u64,
}

impl RawDocumentFetcher {
    pub fn new(client: GithubClient) -> Self {
        Self {
            client,
            max_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    async fn fetch_with_size_limit(&self, url: &str) -> Result<Vec<u8>, GithubError> {
        let response = check_status(self.client.anonymous(url).send().await?)?;

        if let Some(len) = response.content_length() {
            if len > self.max_size {
                return Err(GithubError::TooLarge {
                    size: len,
                    max: self.max_size,
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let size = (bytes.len() + chunk.len()) as u64;
            if size > self.max_size {
                return Err(GithubError::TooLarge {
                    size,
                    max: self.max_size,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

impl DocumentFetcher for RawDocumentFetcher {
    type Error = GithubError;

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
        let bytes = self
            .client
            .with_retry("Document fetch", || self.fetch_with_size_limit(url))
            .await?;
        debug!("Fetched {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> RawDocumentFetcher {
        let client = GithubClient::builder()
            .token("secret")
            .backoff(Duration::from_millis(1), Duration::from_millis(2))
            .build()
            .unwrap();
        RawDocumentFetcher::new(client)
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/owner/awesome/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Awesome\n"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/owner/awesome/main/README.md", mock_server.uri());
        let bytes = fetcher().fetch(&url).await.unwrap();

        assert_eq!(bytes, b"# Awesome\n");
    }

    #[tokio::test]
    async fn test_token_is_not_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/README.md", mock_server.uri());
        fetcher().fetch(&url).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let mock_server = MockServer::start().await;
        let body = " ".repeat(200);
        Mock::given(method("GET"))
            .and(path("/large.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string(&body))
            .mount(&mock_server)
            .await;

        let url = format!("{}/large.md", mock_server.uri());
        let result = fetcher().with_max_size(100).fetch(&url).await;

        match result {
            Err(GithubError::TooLarge { size, max }) => {
                assert!(size > max);
                assert_eq!(max, 100);
            }
            res => panic!("Expected TooLarge error, got {:?}", res),
        }
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.md"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing.md", mock_server.uri());
        let err = fetcher().fetch(&url).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
