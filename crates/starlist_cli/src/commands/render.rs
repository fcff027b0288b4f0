//! Render command implementation

use std::io::Write;
use std::path::Path;

use miette::{IntoDiagnostic, Result};
use starlist_core::{Manager, NoPrune, OfflineProvider, Prune, PruneBeforeHeading};
use tracing::info;

use crate::utils::{create_tokio_runtime, load_config, open_cache};

/// Renders `file` with cached counts only and prints it to stdout.
pub fn run_render(
    config_path: Option<&Path>,
    file: &Path,
    about: &str,
    prune_before: Option<String>,
    no_cache: bool,
) -> Result<()> {
    let config = load_config(config_path, false)?;
    let cache = open_cache(&config, no_cache);

    let source = std::fs::read(file)
        .map_err(|e| miette::miette!("Failed to read {}: {}", file.display(), e))?;

    let prune: Box<dyn Prune> = match prune_before {
        Some(heading) => Box::new(PruneBeforeHeading::new(heading)),
        None => Box::new(NoPrune),
    };

    let manager = Manager::new(OfflineProvider, &cache);
    let runtime = create_tokio_runtime()?;
    let outcome = runtime
        .block_on(manager.process(&source, about, prune.as_ref()))
        .into_diagnostic()?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(outcome.markdown.as_bytes())
        .into_diagnostic()?;
    stdout.flush().into_diagnostic()?;

    info!(
        links = outcome.links,
        resolved = outcome.resolved,
        "Rendered {}",
        file.display()
    );
    Ok(())
}
