//! # starlist_cache
//!
//! Persistent star-count cache for starlist.
//!
//! Entries are keyed by the canonical repository URL
//! (`https://github.com/{owner}/{name}`) and stored on disk with `rkyv`.
//! The in-memory map is guarded by a read-write lock so several lists can
//! share one [`CacheManager`] while they are processed concurrently.

mod entry;
mod error;
mod manager;

pub use entry::StarEntry;
pub use error::CacheError;
pub use manager::{CACHE_FILE_NAME, CacheManager};
