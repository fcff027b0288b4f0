//! Repository references parsed from link destinations.

use std::fmt;

use url::Url;

/// The only host whose links are annotated.
pub const GITHUB_HOST: &str = "github.com";

/// An `{owner, name}` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Creates a reference from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses a link destination.
    ///
    /// Returns `None` unless the destination is an absolute URL on
    /// `github.com` whose path has at least two non-empty segments. Extra
    /// segments (`/tree/main`, `/issues`) are ignored and a trailing `.git`
    /// is stripped from the name.
    ///
    /// ```rust
    /// use starlist_core::RepoRef;
    ///
    /// let repo = RepoRef::from_url("https://github.com/rust-lang/rust.git").unwrap();
    /// assert_eq!(repo, RepoRef::new("rust-lang", "rust"));
    /// assert!(RepoRef::from_url("https://gitlab.com/a/b").is_none());
    /// ```
    pub fn from_url(destination: &str) -> Option<Self> {
        let url = Url::parse(destination).ok()?;
        if url.host_str()? != GITHUB_HOST {
            return None;
        }

        let mut segments = url
            .path()
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty());
        let owner = segments.next()?;
        let name = segments.next()?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return None;
        }

        Some(Self::new(owner, name))
    }

    /// Returns `https://github.com/{owner}/{name}`, the key used by the cache.
    pub fn canonical_url(&self) -> String {
        format!("https://{}/{}/{}", GITHUB_HOST, self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
