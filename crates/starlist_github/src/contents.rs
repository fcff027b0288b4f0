//! Publishing through the repository contents API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use starlist_core::traits::Publisher;
use starlist_core::{Committer, PublishTarget};
use tracing::{debug, info};
use url::Url;

use crate::error::GithubError;
use crate::http_client::{GithubClient, check_status};

pub const DEFAULT_COMMITTER_NAME: &str = "awesome list creator";
pub const DEFAULT_COMMITTER_EMAIL: &str = "awesomelistcreator@example.com";

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    committer: &'a Committer,
}

/// Commits rendered lists with a read-modify-write of the target file.
///
/// The current blob sha is read first and sent back with the update, so a
/// concurrent change to the file makes the update fail with a conflict
/// instead of being overwritten.
#[derive(Debug, Clone)]
pub struct ContentsPublisher {
    client: GithubClient,
    committer: Committer,
}

impl ContentsPublisher {
    pub fn new(client: GithubClient) -> Self {
        Self {
            client,
            committer: Committer {
                name: DEFAULT_COMMITTER_NAME.to_string(),
                email: DEFAULT_COMMITTER_EMAIL.to_string(),
            },
        }
    }

    pub fn with_committer(mut self, committer: Committer) -> Self {
        self.committer = committer;
        self
    }

    pub fn committer(&self) -> &Committer {
        &self.committer
    }

    /// Sha of the file currently at the target, `None` when it does not exist.
    async fn current_sha(
        &self,
        url: &Url,
        target: &PublishTarget,
    ) -> Result<Option<String>, GithubError> {
        let response = self
            .client
            .request(Method::GET, url.clone())
            .query(&[("ref", target.branch.as_str())])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let entry: ContentsEntry = check_status(response)?.json().await?;
        if entry.kind != "file" {
            return Err(GithubError::invalid_response(format!(
                "expected a file at {}/{}:{}, found {}",
                target.owner, target.repo, target.path, entry.kind
            )));
        }
        Ok(Some(entry.sha))
    }

    async fn update(
        &self,
        url: &Url,
        target: &PublishTarget,
        content: &str,
        sha: Option<&str>,
    ) -> Result<(), GithubError> {
        let request = UpdateRequest {
            message: &target.message,
            content: content.to_string(),
            branch: &target.branch,
            sha,
            committer: &self.committer,
        };
        let response = self
            .client
            .request(Method::PUT, url.clone())
            .json(&request)
            .send()
            .await?;
        check_status(response)?;
        Ok(())
    }
}

impl Publisher for ContentsPublisher {
    type Error = GithubError;

    async fn publish(&self, target: &PublishTarget, content: &[u8]) -> Result<(), Self::Error> {
        let url = self
            .client
            .contents_url(&target.owner, &target.repo, &target.path)?;

        let sha = self
            .client
            .with_retry("Contents lookup", || self.current_sha(&url, target))
            .await?;
        debug!(list = %target.list_id, sha = ?sha, "Resolved current blob");

        let encoded = STANDARD.encode(content);
        self.client
            .with_retry("Contents update", || {
                self.update(&url, target, &encoded, sha.as_deref())
            })
            .await?;

        info!(
            list = %target.list_id,
            "Committed {}/{}:{} on {}",
            target.owner,
            target.repo,
            target.path,
            target.branch
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FILE_PATH: &str = "/repos/bot/awesome-go-with-stars/contents/README.md";

    fn target() -> PublishTarget {
        PublishTarget {
            list_id: "awesome-go".to_string(),
            owner: "bot".to_string(),
            repo: "awesome-go-with-stars".to_string(),
            branch: "main".to_string(),
            path: "README.md".to_string(),
            message: "chore: update awesome-go stars".to_string(),
        }
    }

    fn publisher(server: &MockServer) -> ContentsPublisher {
        let client = GithubClient::builder()
            .token("secret")
            .api_base_url(server.uri())
            .backoff(Duration::from_millis(1), Duration::from_millis(2))
            .build()
            .unwrap();
        ContentsPublisher::new(client)
    }

    #[tokio::test]
    async fn test_publish_updates_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .and(query_param("ref", "main"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "type": "file", "sha": "abc123" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE_PATH))
            .and(body_json(json!({
                "message": "chore: update awesome-go stars",
                "content": "IyBMaXN0Cg==",
                "branch": "main",
                "sha": "abc123",
                "committer": {
                    "name": "awesome list creator",
                    "email": "awesomelistcreator@example.com"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        publisher(&server)
            .publish(&target(), b"# List\n")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_publish_creates_missing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE_PATH))
            .and(body_json(json!({
                "message": "chore: update awesome-go stars",
                "content": "IyBMaXN0Cg==",
                "branch": "main",
                "committer": { "name": "bot", "email": "bot@example.com" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        publisher(&server)
            .with_committer(Committer {
                name: "bot".to_string(),
                email: "bot@example.com".to_string(),
            })
            .publish(&target(), b"# List\n")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_conflict_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "type": "file", "sha": "stale" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE_PATH))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;

        let err = publisher(&server)
            .publish(&target(), b"# List\n")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_directory_target_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FILE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "type": "dir", "sha": "abc" })),
            )
            .mount(&server)
            .await;

        let result = publisher(&server).publish(&target(), b"# List\n").await;

        assert!(matches!(result, Err(GithubError::InvalidResponse(_))));
    }
}
