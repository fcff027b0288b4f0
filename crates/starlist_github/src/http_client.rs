//! Authenticated GitHub HTTP client with retry and backoff.

use std::future::Future;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::warn;
use url::Url;

use crate::error::GithubError;

/// Default REST and GraphQL API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRIES: u32 = 2;

/// Delay before the first retry. Doubles per attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for the retry delay.
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(4);

const USER_AGENT: &str = concat!("starlist/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// HTTP client for the GitHub API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base_url: String,
    token: Option<String>,
    retries: u32,
    retry_delay: Duration,
    max_retry_delay: Duration,
}

/// Builder for [`GithubClient`].
#[derive(Debug)]
pub struct GithubClientBuilder {
    token: Option<String>,
    api_base_url: String,
    timeout: Duration,
    retries: u32,
    retry_delay: Duration,
    max_retry_delay: Duration,
}

impl GithubClient {
    pub fn builder() -> GithubClientBuilder {
        GithubClientBuilder {
            token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_retry_delay: DEFAULT_MAX_RETRY_DELAY,
        }
    }

    /// Creates a client with default settings.
    pub fn new(token: Option<String>) -> Result<Self, GithubError> {
        let builder = Self::builder();
        match token {
            Some(token) => builder.token(token).build(),
            None => builder.build(),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Joins `path` onto the API root.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// URL of a file through the contents API.
    ///
    /// Each component is percent-encoded as a path segment; `/` inside
    /// `path` separates directories.
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url, GithubError> {
        let mut url = Url::parse(&self.api_url("repos"))
            .map_err(|e| GithubError::invalid_url(format!("{}: {e}", self.api_base_url)))?;
        url.path_segments_mut()
            .map_err(|()| GithubError::invalid_url(self.api_base_url.clone()))?
            .pop_if_empty()
            .push(owner)
            .push(repo)
            .push("contents")
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// Starts an API request carrying the token and API headers.
    pub fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Starts a request without credentials, for URLs outside the API.
    pub fn anonymous(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.http.get(url)
    }

    /// Delays between attempts: the initial delay doubling up to the cap.
    fn backoff(&self) -> impl Iterator<Item = Duration> + use<> {
        let factor = (self.retry_delay.as_millis() / 2).max(1) as u64;
        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_retry_delay)
            .take(self.retries as usize)
    }

    /// Runs `op`, retrying transient failures with exponential backoff.
    pub async fn with_retry<T, F, Fut>(&self, what: &str, op: F) -> Result<T, GithubError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GithubError>>,
    {
        RetryIf::spawn(self.backoff(), op, |e: &GithubError| {
            let retryable = e.is_retryable();
            if retryable {
                warn!("{what} failed: {e}");
            }
            retryable
        })
        .await
    }
}

/// Turns a non-success status into [`GithubError::Http`].
pub fn check_status(response: Response) -> Result<Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(GithubError::Http {
            status,
            url: response.url().to_string(),
        })
    }
}

impl GithubClientBuilder {
    /// Token sent as a bearer credential to the API.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// API root, overridable for tests and GitHub Enterprise.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Initial and maximum retry delay.
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.retry_delay = initial;
        self.max_retry_delay = max;
        self
    }

    pub fn build(self) -> Result<GithubClient, GithubError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GithubError::ClientBuild(e.to_string()))?;

        Ok(GithubClient {
            http,
            api_base_url: self.api_base_url,
            token: self.token,
            retries: self.retries,
            retry_delay: self.retry_delay,
            max_retry_delay: self.max_retry_delay,
        })
    }
}
