//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Starlist - awesome lists sorted by GitHub stars
#[derive(Parser)]
#[command(name = "starlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable caching
    #[arg(long, global = true)]
    pub no_cache: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Annotate, resort and publish the configured lists
    Run {
        /// Only process the list with this id (repeatable)
        #[arg(short, long = "list", value_name = "ID")]
        lists: Vec<String>,

        /// Write results to a local directory instead of committing them
        #[arg(long)]
        dry_run: bool,

        /// Directory for dry-run output
        #[arg(long, value_name = "DIR", default_value = "starlist-out", requires = "dry_run")]
        output_dir: PathBuf,
    },

    /// Annotate a local file with cached star counts and print it
    Render {
        /// Markdown file to render
        file: PathBuf,

        /// Text prepended to the output
        #[arg(long, default_value = "")]
        about: String,

        /// Drop everything before the first heading with this text
        #[arg(long, value_name = "HEADING")]
        prune_before: Option<String>,
    },

    /// Manage the star cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Delete the persisted star cache
    Clean,
}
