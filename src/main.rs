//! # Portfolio CLI (`portfolio`)
//!
//! Serves the portfolio API and inspects the content it serves.
//!
//! ## Usage
//!
//! ```bash
//! portfolio --config ./config/portfolio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `portfolio serve` | Start the HTTP API |
//! | `portfolio search "<query>"` | Run a search and print the answer |
//! | `portfolio content <collection>` | Print a content collection as JSON |
//! | `portfolio status` | Show per-collection health |
//! | `portfolio completions <shell>` | Print shell completions |

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use portfolio_api::config;
use portfolio_api::content::{self, Collection};
use portfolio_api::search;
use portfolio_api::server;

/// Portfolio API: content and search backend for a personal portfolio site.
///
/// All commands except `completions` read a TOML configuration file given
/// by `--config`. See `config/portfolio.example.toml`.
#[derive(Parser)]
#[command(
    name = "portfolio",
    about = "Portfolio API: content and search backend for a personal portfolio site",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/portfolio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,

    /// Search the portfolio content.
    ///
    /// Uses the configured delegate when it is enabled, falling back to
    /// keyword search.
    Search {
        /// The search query string.
        query: String,

        /// Skip the delegate and use keyword search only.
        #[arg(long)]
        local: bool,
    },

    /// Print a content collection as JSON.
    Content {
        /// `experiences`, `projects`, `blogs`, `education`, or `case-studies`.
        collection: String,
    },

    /// Show whether each content collection loads, and how many records it has.
    Status,

    /// Print shell completions to stdout.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_api=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "portfolio", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Search { query, local } => {
            search::run_search(&cfg, &query, local).await?;
        }
        Commands::Content { collection } => {
            let collection = Collection::from_name(&collection).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown collection: {}. Use experiences, projects, blogs, education, or case-studies.",
                    collection
                )
            })?;
            let value = content::load_collection(&cfg, collection)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Status => {
            content::print_status(&cfg);
        }
        Commands::Completions { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}
