//! Starlist CLI
//!
//! Annotates awesome lists with GitHub star counts and sorts them by
//! popularity.

mod cli;
mod commands;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{CacheCommands, Cli, Commands};
use crate::commands::run::RunOptions;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Run {
            lists,
            dry_run,
            output_dir,
        } => commands::run::run_lists(RunOptions {
            config_path: cli.config,
            lists,
            dry_run,
            output_dir,
            no_cache: cli.no_cache,
        }),
        Commands::Render {
            file,
            about,
            prune_before,
        } => {
            commands::render::run_render(
                cli.config.as_deref(),
                &file,
                &about,
                prune_before,
                cli.no_cache,
            )?;
            Ok(false)
        }
        Commands::Cache {
            command: CacheCommands::Clean,
        } => {
            commands::cache::run_cache_clean(cli.config.as_deref())?;
            Ok(false)
        }
    }
}
