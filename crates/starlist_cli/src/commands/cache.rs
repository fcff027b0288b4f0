//! Cache command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use starlist_core::CacheManager;
use tracing::info;

use crate::utils::load_config;

pub fn run_cache_clean(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, false)?;
    let cache = CacheManager::new(config.cache_path());

    if !cache.clean().into_diagnostic()? {
        info!("No cache file at {}", cache.cache_file().display());
    }
    Ok(())
}
