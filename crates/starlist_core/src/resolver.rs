//! Star count resolution with cache fallback.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use starlist_ast::NodeId;
use thiserror::Error;
use tracing::{debug, warn};

use crate::traits::{StarCache, StarsProvider};
use crate::{ExtractedLink, RepoRef};

/// Counters describing how one document's links were resolved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    /// Repositories answered by the live provider.
    pub live: usize,
    /// Repositories answered by a fresh cache entry without a lookup.
    pub fresh: usize,
    /// Repositories whose lookup failed and fell back to the cache.
    pub fallback: usize,
    /// Repositories with neither a live count nor a cached one.
    pub missing: usize,
    /// Links that reused the result of an earlier link to the same repository.
    pub memoized: usize,
}

/// Star counts for the links of one document.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Link node to count. Unresolved links are absent.
    pub counts: HashMap<NodeId, u64>,
    pub stats: ResolveStats,
}

/// Resolves star counts one repository at a time.
pub struct Resolver<'a, P, C> {
    provider: &'a P,
    cache: &'a C,
    ttl: Option<Duration>,
}

impl<'a, P, C> Resolver<'a, P, C>
where
    P: StarsProvider,
    C: StarCache,
{
    pub fn new(provider: &'a P, cache: &'a C) -> Self {
        Self {
            provider,
            cache,
            ttl: None,
        }
    }

    /// Uses cache entries younger than `ttl` without a live lookup.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Resolves every link, in order, through a single sequential queue.
    ///
    /// Each distinct repository is looked up at most once per call.
    pub async fn resolve(&self, links: &[ExtractedLink]) -> Resolution {
        let mut queue: VecDeque<&ExtractedLink> = links.iter().collect();
        let mut memo: HashMap<String, Option<u64>> = HashMap::new();
        let mut resolution = Resolution::default();

        while let Some(link) = queue.pop_front() {
            let key = link.repo.canonical_url();
            let count = match memo.get(&key) {
                Some(count) => {
                    resolution.stats.memoized += 1;
                    *count
                }
                None => {
                    let count = self.lookup(&link.repo, &key, &mut resolution.stats).await;
                    memo.insert(key, count);
                    count
                }
            };

            if let Some(count) = count {
                resolution.counts.insert(link.node, count);
            }
        }

        debug!(
            live = resolution.stats.live,
            fresh = resolution.stats.fresh,
            fallback = resolution.stats.fallback,
            missing = resolution.stats.missing,
            "Resolved {} of {} links",
            resolution.counts.len(),
            links.len()
        );
        resolution
    }

    async fn lookup(&self, repo: &RepoRef, key: &str, stats: &mut ResolveStats) -> Option<u64> {
        if let Some(ttl) = self.ttl
            && let Some(entry) = self.cache.get(key)
            && entry.is_fresh(ttl)
        {
            debug!(repo = %repo, stars = entry.stars, "Using fresh cache entry");
            stats.fresh += 1;
            return Some(entry.stars);
        }

        match self.provider.star_count(repo).await {
            Ok(stars) => {
                if let Err(e) = self.cache.put(key, stars) {
                    warn!(repo = %repo, error = %e, "Failed to update cache");
                }
                debug!(repo = %repo, stars, "Fetched star count");
                stats.live += 1;
                Some(stars)
            }
            Err(e) => match self.cache.get(key) {
                Some(entry) => {
                    warn!(repo = %repo, error = %e, stars = entry.stars, "Lookup failed, using cached count");
                    stats.fallback += 1;
                    Some(entry.stars)
                }
                None => {
                    warn!(repo = %repo, error = %e, "Lookup failed and no cached count");
                    stats.missing += 1;
                    None
                }
            },
        }
    }
}

/// Error returned by [`OfflineProvider`].
#[derive(Debug, Error)]
#[error("offline mode: no live lookup for {0}")]
pub struct OfflineError(String);

/// A provider that never answers, so every count comes from the cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

impl StarsProvider for OfflineProvider {
    type Error = OfflineError;

    async fn star_count(&self, repo: &RepoRef) -> Result<u64, Self::Error> {
        Err(OfflineError(repo.to_string()))
    }
}
