//! Star counts from the GraphQL API.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use starlist_core::RepoRef;
use starlist_core::traits::StarsProvider;
use tracing::{debug, warn};

use crate::error::GithubError;
use crate::http_client::{GithubClient, check_status};

const STARS_QUERY: &str = "\
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) { stargazerCount }
  rateLimit { remaining resetAt cost }
}";

/// Remaining points below which the rate limit is logged as a warning.
const RATE_LIMIT_WARN_THRESHOLD: u64 = 100;

/// GraphQL rate limit state reported with each answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub remaining: u64,
    pub reset_at: String,
    #[serde(default)]
    pub cost: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarsData {
    repository: Option<RepositoryStars>,
    rate_limit: Option<RateLimit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryStars {
    stargazer_count: i64,
}

/// Looks up `stargazerCount` one repository at a time.
#[derive(Debug, Clone)]
pub struct GithubStarsProvider {
    client: GithubClient,
}

impl GithubStarsProvider {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }

    async fn query(&self, repo: &RepoRef) -> Result<u64, GithubError> {
        let body = json!({
            "query": STARS_QUERY,
            "variables": { "owner": repo.owner, "name": repo.name },
        });

        let response = self
            .client
            .request(Method::POST, self.client.api_url("graphql"))
            .json(&body)
            .send()
            .await?;
        let response: GraphQlResponse<StarsData> = check_status(response)?.json().await?;

        let data = match (response.data, response.errors.is_empty()) {
            (Some(data), true) => data,
            (data, _) => {
                if response
                    .errors
                    .iter()
                    .any(|e| e.kind.as_deref() == Some("NOT_FOUND"))
                {
                    return Err(GithubError::NotFound(repo.to_string()));
                }
                if response.errors.is_empty() {
                    return Err(GithubError::invalid_response("missing data"));
                }
                // Partial data still carries the rate limit.
                if let Some(limit) = data.and_then(|d| d.rate_limit) {
                    log_rate_limit(&limit);
                }
                let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
                return Err(GithubError::GraphQl(messages.join("; ")));
            }
        };

        if let Some(limit) = &data.rate_limit {
            log_rate_limit(limit);
        }

        let count = data
            .repository
            .ok_or_else(|| GithubError::NotFound(repo.to_string()))?
            .stargazer_count;
        u64::try_from(count).map_err(|_| GithubError::InvalidCount {
            repo: repo.to_string(),
            count,
        })
    }
}

fn log_rate_limit(limit: &RateLimit) {
    if limit.remaining < RATE_LIMIT_WARN_THRESHOLD {
        warn!(
            remaining = limit.remaining,
            reset_at = %limit.reset_at,
            "GraphQL rate limit running low"
        );
    } else {
        debug!(
            remaining = limit.remaining,
            reset_at = %limit.reset_at,
            cost = ?limit.cost,
            "GraphQL rate limit"
        );
    }
}

impl StarsProvider for GithubStarsProvider {
    type Error = GithubError;

    async fn star_count(&self, repo: &RepoRef) -> Result<u64, Self::Error> {
        self.client
            .with_retry("Star lookup", || self.query(repo))
            .await
    }
}
