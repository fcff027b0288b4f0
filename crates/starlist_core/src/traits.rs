//! Collaborators the engine consumes.
//!
//! The engine never talks to the network or the filesystem itself; it drives
//! these traits. Concrete implementations live in `starlist_github`
//! (provider, publisher, fetcher), `starlist_cache` (cache) and
//! [`DirectoryPublisher`](crate::DirectoryPublisher).

use std::convert::Infallible;
use std::future::Future;

use starlist_cache::{CacheManager, StarEntry};

use crate::{PublishTarget, RepoRef};

/// Looks up the live star count of a repository.
pub trait StarsProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the star count of `repo`.
    fn star_count(&self, repo: &RepoRef) -> impl Future<Output = Result<u64, Self::Error>> + Send;
}

/// Stores the last known star count per canonical repository URL.
pub trait StarCache: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(&self, key: &str) -> Option<StarEntry>;

    fn put(&self, key: &str, stars: u64) -> Result<(), Self::Error>;
}

/// Commits a rendered document to its destination.
pub trait Publisher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn publish(
        &self,
        target: &PublishTarget,
        content: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Downloads the raw bytes of a source document.
pub trait DocumentFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}

impl StarCache for CacheManager {
    type Error = Infallible;

    fn get(&self, key: &str) -> Option<StarEntry> {
        CacheManager::get(self, key)
    }

    fn put(&self, key: &str, stars: u64) -> Result<(), Self::Error> {
        CacheManager::put(self, key, stars);
        Ok(())
    }
}

impl<T: StarsProvider> StarsProvider for &T {
    type Error = T::Error;

    fn star_count(&self, repo: &RepoRef) -> impl Future<Output = Result<u64, Self::Error>> + Send {
        (**self).star_count(repo)
    }
}

impl<T: StarCache> StarCache for &T {
    type Error = T::Error;

    fn get(&self, key: &str) -> Option<StarEntry> {
        (**self).get(key)
    }

    fn put(&self, key: &str, stars: u64) -> Result<(), Self::Error> {
        (**self).put(key, stars)
    }
}

impl<T: Publisher> Publisher for &T {
    type Error = T::Error;

    fn publish(
        &self,
        target: &PublishTarget,
        content: &[u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        (**self).publish(target, content)
    }
}
