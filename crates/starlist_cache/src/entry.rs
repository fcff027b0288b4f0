//! Cache entry types.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A cached star count for one repository.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
pub struct StarEntry {
    /// Number of stargazers.
    pub stars: u64,

    /// Unix timestamp (seconds) when the count was fetched.
    pub updated_at: u64,
}

impl StarEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(stars: u64) -> Self {
        Self {
            stars,
            updated_at: unix_now(),
        }
    }

    /// Creates an entry with an explicit timestamp.
    pub fn with_timestamp(stars: u64, updated_at: u64) -> Self {
        Self { stars, updated_at }
    }

    /// Returns how old this entry is, in seconds.
    pub fn age_secs(&self) -> u64 {
        unix_now().saturating_sub(self.updated_at)
    }

    /// Returns true if the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age_secs() < ttl.as_secs()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
