//! # xkcd CLI
//!
//! The `xkcd` binary builds and queries the offline comic index.
//!
//! ## Usage
//!
//! ```bash
//! xkcd [--config ./config/xkcd.toml] [--index ./xkcd_index.json] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `xkcd update` | Download missing comics into the index |
//! | `xkcd search <keywords>...` | Search comics by keywords |
//! | `xkcd show <number>` | Print one comic |
//! | `xkcd random` | Print a random comic |
//! | `xkcd stats` | Print index statistics |
//! | `xkcd completions <shell>` | Print a shell completion script |
//!
//! ## Examples
//!
//! ```bash
//! xkcd update
//! xkcd search "programming python"
//! xkcd show 353
//! RUST_LOG=xkcd_index=debug xkcd update --progress json
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xkcd_index::config::{self, Config};
use xkcd_index::progress::ProgressMode;
use xkcd_index::{get, ingest, search, stats};

const DEFAULT_CONFIG_PATH: &str = "./config/xkcd.toml";

/// xkcd: an offline, searchable index of xkcd comics.
#[derive(Parser)]
#[command(
    name = "xkcd",
    about = "xkcd: an offline, searchable index of xkcd comics",
    version,
    long_about = "Downloads each comic's JSON description once, keeps them in a local \
    index file, and answers keyword searches against that index without touching the network."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/xkcd.toml` when that file exists; otherwise
    /// built-in defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the index file. Overrides `[index].path` from the config.
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Download and update the comic index.
    ///
    /// Fetches every comic between the last synced number and the latest
    /// published one that the index doesn't already hold. Progress is
    /// checkpointed, so an interrupted update resumes where it stopped.
    Update {
        /// Progress output on stderr. Defaults to `human` on a TTY, `off` otherwise.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,
    },

    /// Search comics by keywords.
    ///
    /// Matches are case-insensitive substrings, weighted by field:
    /// title, safe title, alt text, then transcript.
    Search {
        /// One or more keywords.
        #[arg(required = true, num_args = 1..)]
        keywords: Vec<String>,

        /// Maximum number of results to print (at least 1).
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: Option<usize>,
    },

    /// Show a specific comic by number.
    Show {
        /// Comic number.
        number: u32,
    },

    /// Show a random comic from the index.
    Random,

    /// Show index statistics.
    Stats,

    /// Print a shell completion script to stdout.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xkcd_index=info,xkcd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "xkcd", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = resolve_config(cli.config.as_deref(), cli.index)?;

    match cli.command {
        Commands::Update { progress } => {
            let mode = progress.unwrap_or_else(ProgressMode::default_for_tty);
            ingest::run_update(&cfg, mode)?;
        }
        Commands::Search { keywords, limit } => {
            search::run_search(&cfg, &keywords.join(" "), limit)?;
        }
        Commands::Show { number } => {
            get::run_show(&cfg, number)?;
        }
        Commands::Random => {
            get::run_random(&cfg)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}

/// An explicit `--config` must load; the default path is optional.
fn resolve_config(explicit: Option<&Path>, index: Option<PathBuf>) -> Result<Config> {
    let mut cfg = match explicit {
        Some(path) => config::load_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                config::load_config(default_path)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(path) = index {
        cfg.index.path = path;
    }

    Ok(cfg)
}
