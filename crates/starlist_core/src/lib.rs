//! # starlist_core
//!
//! The annotation and reordering engine for starlist.
//!
//! This crate provides:
//! - Extraction of GitHub repository links from a parsed document
//! - Star count resolution with cache fallback
//! - Star markers inserted before links, and list resorting by stars
//! - The `Manager` pipeline and its configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use starlist_core::{Manager, NoPrune, StarlistConfig};
//!
//! let config = StarlistConfig::from_file(".starlist.jsonc")?;
//! let manager = Manager::new(provider, &cache).with_ttl(config.ttl());
//!
//! let outcome = manager.process(source.as_bytes(), "", &NoPrune).await?;
//! println!("{}", outcome.markdown);
//! ```

mod annotator;
mod config;
mod error;
mod extractor;
mod manager;
mod prune;
mod publisher;
mod repo;
mod resolver;
mod resorter;
pub mod traits;

pub use annotator::{StarAttributes, annotate, format_marker};
pub use config::{
    CONFIG_FILE_NAMES, CacheSettings, Committer, Defaults, ListConfig, OutputConfig, PruneConfig,
    ResolvedList, SourceConfig, StarlistConfig,
};
pub use error::StarlistError;
pub use extractor::{ExtractedLink, extract_links};
pub use manager::{Manager, ProcessOutcome};
pub use prune::{NoPrune, Prune, PruneBeforeHeading};
pub use publisher::{DirectoryPublisher, PublishTarget};
pub use repo::{GITHUB_HOST, RepoRef};
pub use resolver::{OfflineError, OfflineProvider, Resolution, ResolveStats, Resolver};
pub use resorter::resort_lists;

pub use starlist_cache::{CacheManager, StarEntry};

#[cfg(test)]
pub mod test_utils;
