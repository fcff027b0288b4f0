//! Run command implementation

use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use miette::{IntoDiagnostic, Result};
use starlist_core::traits::{DocumentFetcher, Publisher, StarCache, StarsProvider};
use starlist_core::{DirectoryPublisher, Manager, ResolvedList};
use starlist_github::{ContentsPublisher, GithubClient, GithubStarsProvider, RawDocumentFetcher};
use tracing::{error, info, warn};

use crate::utils::{create_tokio_runtime, load_config, open_cache};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub lists: Vec<String>,
    pub dry_run: bool,
    pub output_dir: PathBuf,
    pub no_cache: bool,
}

/// Processes the selected lists. Returns true if any list failed.
pub fn run_lists(options: RunOptions) -> Result<bool> {
    let config = load_config(options.config_path.as_deref(), true)?;
    let lists = config.resolve_lists(&options.lists).into_diagnostic()?;
    if lists.is_empty() {
        warn!("No lists configured");
        return Ok(false);
    }

    let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
    if token.is_none() {
        if !options.dry_run {
            return Err(miette::miette!(
                "{} is required to publish. Use --dry-run to write the lists locally.",
                TOKEN_ENV
            ));
        }
        warn!("{} is not set; star lookups will likely fail", TOKEN_ENV);
    }

    let client = GithubClient::new(token).into_diagnostic()?;
    let cache = open_cache(&config, options.no_cache);
    let manager = Manager::new(GithubStarsProvider::new(client.clone()), &cache)
        .with_ttl(config.ttl());
    let fetcher = RawDocumentFetcher::new(client.clone());

    let runtime = create_tokio_runtime()?;
    let failures = if options.dry_run {
        let publisher = DirectoryPublisher::new(&options.output_dir);
        runtime.block_on(star_lists(&manager, &fetcher, &publisher, &lists))
    } else {
        let mut publisher = ContentsPublisher::new(client);
        if let Some(committer) = config.committer() {
            publisher = publisher.with_committer(committer.clone());
        }
        runtime.block_on(star_lists(&manager, &fetcher, &publisher, &lists))
    };

    if let Err(e) = cache.save() {
        warn!("Failed to save cache: {e}");
    }

    report(&lists, failures, options.dry_run.then_some(options.output_dir.as_path()));
    Ok(failures > 0)
}

/// Runs every list concurrently; a failure only ends its own list.
async fn star_lists<P, C, F, U>(
    manager: &Manager<P, C>,
    fetcher: &F,
    publisher: &U,
    lists: &[ResolvedList],
) -> usize
where
    P: StarsProvider,
    C: StarCache,
    F: DocumentFetcher,
    U: Publisher,
{
    let results = join_all(
        lists
            .iter()
            .map(|list| manager.star_list(fetcher, publisher, list)),
    )
    .await;

    let mut failures = 0;
    for (list, result) in lists.iter().zip(results) {
        match result {
            Ok(outcome) => info!(
                list = %list.id,
                links = outcome.links,
                resolved = outcome.resolved,
                live = outcome.stats.live,
                fresh = outcome.stats.fresh,
                fallback = outcome.stats.fallback,
                missing = outcome.stats.missing,
                "Finished {}",
                list.name
            ),
            Err(e) => {
                error!(list = %list.id, "Failed: {e}");
                failures += 1;
            }
        }
    }
    failures
}

fn report(lists: &[ResolvedList], failures: usize, output_dir: Option<&Path>) {
    let done = lists.len() - failures;
    match output_dir {
        Some(dir) => info!("Wrote {done} of {} lists to {}", lists.len(), dir.display()),
        None => info!("Published {done} of {} lists", lists.len()),
    }
}
