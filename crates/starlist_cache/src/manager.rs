//! Cache manager for repository star counts.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{CacheError, StarEntry};

/// File name of the persisted cache inside the cache directory.
pub const CACHE_FILE_NAME: &str = "stars.rkyv";

/// Manages the star cache for all lists.
///
/// All accessors take `&self`; the map is guarded by a [`RwLock`] whose
/// guards never outlive a single call.
pub struct CacheManager {
    /// Directory where the cache file is stored.
    cache_dir: PathBuf,
    /// In-memory cache entries, keyed by canonical repository URL.
    entries: RwLock<HashMap<String, StarEntry>>,
    /// Whether cache is enabled.
    enabled: bool,
}

impl CacheManager {
    /// Creates a new cache manager.
    ///
    /// # Arguments
    ///
    /// * `cache_dir` - Directory to store the cache file
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            entries: RwLock::new(HashMap::new()),
            enabled: true,
        }
    }

    /// Disables caching.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Enables caching.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Returns whether caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path of the persisted cache file.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    /// Gets the cached entry for a repository key.
    pub fn get(&self, key: &str) -> Option<StarEntry> {
        if !self.enabled {
            return None;
        }
        self.entries.read().get(key).copied()
    }

    /// Stores an entry for a repository key.
    pub fn set(&self, key: impl Into<String>, entry: StarEntry) {
        if self.enabled {
            self.entries.write().insert(key.into(), entry);
        }
    }

    /// Records a freshly fetched star count, stamped with the current time.
    pub fn put(&self, key: impl Into<String>, stars: u64) -> StarEntry {
        let entry = StarEntry::new(stars);
        self.set(key, entry);
        entry
    }

    /// Removes a cache entry.
    pub fn remove(&self, key: &str) -> Option<StarEntry> {
        self.entries.write().remove(key)
    }

    /// Clears all in-memory entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Loads cache from disk.
    ///
    /// A missing cache file is not an error; the cache simply starts empty.
    pub fn load(&self) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }

        let cache_file = self.cache_file();

        if !cache_file.exists() {
            debug!("No cache file found at {}", cache_file.display());
            return Ok(());
        }

        let content = fs::read(&cache_file)?;
        let entries: HashMap<String, StarEntry> =
            rkyv::from_bytes::<_, rkyv::rancor::Error>(&content)
                .map_err(|e| CacheError::corrupted(e.to_string()))?;

        info!("Loaded {} cache entries", entries.len());
        *self.entries.write() = entries;

        Ok(())
    }

    /// Saves cache to disk.
    pub fn save(&self) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }

        // Ensure cache directory exists
        fs::create_dir_all(&self.cache_dir)?;

        let cache_file = self.cache_file();
        let (bytes, count) = {
            let entries = self.entries.read();
            let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&*entries)
                .map_err(|e| CacheError::serialization(e.to_string()))?;
            (bytes, entries.len())
        };

        fs::write(&cache_file, bytes)?;

        info!("Saved {} cache entries to {}", count, cache_file.display());

        Ok(())
    }

    /// Clears memory and deletes the persisted cache file.
    ///
    /// Returns true if a file was removed.
    pub fn clean(&self) -> Result<bool, CacheError> {
        self.clear();

        let cache_file = self.cache_file();
        if !cache_file.exists() {
            return Ok(false);
        }
        fs::remove_file(&cache_file)?;
        info!("Removed cache file {}", cache_file.display());
        Ok(true)
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(".starlist-cache")
    }
}
