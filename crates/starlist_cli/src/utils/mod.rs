//! CLI utility functions

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use starlist_core::{CacheManager, StarlistConfig};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Loads the configuration from `path`, or discovers it in the working
/// directory.
///
/// Without a file, `required` decides between an error and the defaults.
pub fn load_config(path: Option<&Path>, required: bool) -> Result<StarlistConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => StarlistConfig::discover(std::env::current_dir().into_diagnostic()?),
    };

    match path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            StarlistConfig::from_file(&path).into_diagnostic()
        }
        None if required => Err(miette::miette!(
            "No configuration file found (.starlist.jsonc or .starlist.json). Use --config to point at one."
        )),
        None => Ok(StarlistConfig::new()),
    }
}

/// Opens the star cache, loading persisted entries unless disabled.
///
/// A corrupt cache file is discarded with a warning.
pub fn open_cache(config: &StarlistConfig, no_cache: bool) -> CacheManager {
    let mut cache = CacheManager::new(config.cache_path());
    if no_cache {
        cache.disable();
        return cache;
    }
    if let Err(e) = cache.load() {
        warn!("Ignoring unreadable cache: {e}");
    }
    cache
}
