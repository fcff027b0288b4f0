//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use starlist_cache::StarEntry;

use crate::RepoRef;
use crate::traits::{StarCache, StarsProvider};

/// Answers from a fixed `owner/name -> stars` table; anything else fails.
pub struct StaticProvider {
    counts: HashMap<String, u64>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new<'a>(counts: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        Self {
            counts: counts
                .into_iter()
                .map(|(repo, stars)| (repo.to_string(), stars))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StarsProvider for StaticProvider {
    type Error = io::Error;

    async fn star_count(&self, repo: &RepoRef) -> Result<u64, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.counts
            .get(&repo.to_string())
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, repo.to_string()))
    }
}

/// A cache that records how often it was written.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, StarEntry>>,
    puts: AtomicUsize,
    fail_puts: bool,
}

impl MemoryCache {
    pub fn failing_puts() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, key: &str, stars: u64, updated_at: u64) {
        self.entries
            .lock()
            .insert(key.to_string(), StarEntry::with_timestamp(stars, updated_at));
    }

    pub fn stars(&self, key: &str) -> Option<u64> {
        self.entries.lock().get(key).map(|e| e.stars)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl StarCache for MemoryCache {
    type Error = io::Error;

    fn get(&self, key: &str) -> Option<StarEntry> {
        self.entries.lock().get(key).copied()
    }

    fn put(&self, key: &str, stars: u64) -> Result<(), Self::Error> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts {
            return Err(io::Error::other("read-only cache"));
        }
        self.entries
            .lock()
            .insert(key.to_string(), StarEntry::new(stars));
        Ok(())
    }
}
