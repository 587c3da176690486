//! # CultureVault CLI (`cv`)
//!
//! The `cv` binary is the primary interface for CultureVault. It provides
//! commands for configuration setup, place search (local catalog plus AI
//! gateway), record display, selection history, catalog browsing, and
//! starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! cv --config ./culturevault.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cv init` | Write the starter config and create the data directory |
//! | `cv search "<query>"` | Merge catalog matches with an AI gateway lookup |
//! | `cv show <id>` | Print a place's full cultural record |
//! | `cv history list` | List recent selections, most recent first |
//! | `cv history clear` | Drop all recent selections |
//! | `cv catalog list` | List catalog entries |
//! | `cv catalog regions` | List regions with continents and entry counts |
//! | `cv serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! # Write the starter config
//! cv init
//!
//! # Filter the local catalog
//! cv search "kyoto"
//!
//! # A place the catalog does not know; falls through to the AI gateway
//! cv search "timbuktu"
//!
//! # Pick the first suggestion, recording it in history
//! cv search "varanasi" --select 1
//!
//! # Stay offline regardless of gateway config
//! cv search "rome" --local-only
//!
//! # Full record as JSON
//! cv show kyoto --json
//!
//! # Start the HTTP server on a custom port
//! cv serve --port 9000
//! ```

mod catalog_cmd;
mod config;
mod dataset;
mod gateway;
mod history;
mod search;
mod server;
mod show;
mod stores;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CultureVault CLI: a local-first cultural heritage catalog with
/// AI-assisted place search.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means defaults: bundled catalog, `./data` storage,
/// and the hosted AI gateway.
#[derive(Parser)]
#[command(
    name = "cv",
    about = "CultureVault: a local-first cultural heritage catalog with AI-assisted place search",
    version,
    long_about = "CultureVault keeps a curated catalog of places and their cultural records and \
    merges instant catalog filtering with a debounced AI gateway lookup. Selections are recorded \
    in a persistent history, and remote results are stashed so they can be shown like any \
    catalog entry."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./culturevault.toml`. Catalog, search tuning, gateway,
    /// storage, and server settings are read from this file.
    #[arg(long, global = true, default_value = "./culturevault.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Write the starter configuration file.
    ///
    /// Creates the config at the `--config` path with every default spelled
    /// out, and creates the data directory. Refuses to overwrite an
    /// existing file unless `--force` is given.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },

    /// Search for a place.
    ///
    /// Filters the local catalog instantly. When local matches are sparse
    /// and the query is long enough, also consults the AI gateway after the
    /// configured debounce and appends the remote result to the list.
    Search {
        /// The place to look for. An empty query lists the default
        /// catalog slice.
        query: String,

        /// Select suggestion N (1-based) after searching, recording it in
        /// history exactly as tapping the row would.
        #[arg(long)]
        select: Option<usize>,

        /// Print the suggestion list as JSON.
        #[arg(long)]
        json: bool,

        /// Skip the AI gateway even if it is configured.
        #[arg(long)]
        local_only: bool,
    },

    /// Print a place's full cultural record.
    ///
    /// Resolves the id against the catalog first, then against stashed
    /// remote lookups from earlier selections.
    Show {
        /// Place id (e.g. `kyoto`).
        id: String,

        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Manage the recent-selection history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Browse the local catalog.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Start the HTTP API server.
    ///
    /// Serves the suggestion list, catalog records, and the direct lookup
    /// endpoint for browser frontends.
    Serve {
        /// Override `[server].host` from the config.
        #[arg(long)]
        host: Option<String>,

        /// Override `[server].port` from the config.
        #[arg(long)]
        port: Option<u16>,
    },
}

/// History subcommands.
#[derive(Subcommand)]
enum HistoryAction {
    /// List recent selections, most recent first.
    List,
    /// Drop all recent selections.
    Clear,
}

/// Catalog subcommands.
#[derive(Subcommand)]
enum CatalogAction {
    /// List catalog entries in catalog order.
    List {
        /// Maximum number of entries to print.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List every region with its continent and entry count.
    Regions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Init writes the config file, so it runs before config loading
    if let Commands::Init { force } = &cli.command {
        config::run_init(&cli.config, *force)?;
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
        Commands::Search {
            query,
            select,
            json,
            local_only,
        } => {
            search::run_search(&cfg, &query, select, json, local_only).await?;
        }
        Commands::Show { id, json } => {
            show::run_show(&cfg, &id, json)?;
        }
        Commands::History { action } => match action {
            HistoryAction::List => {
                history::run_history_list(&cfg)?;
            }
            HistoryAction::Clear => {
                history::run_history_clear(&cfg)?;
            }
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { limit } => {
                catalog_cmd::run_catalog_list(&cfg, limit)?;
            }
            CatalogAction::Regions => {
                catalog_cmd::run_catalog_regions(&cfg)?;
            }
        },
        Commands::Serve { host, port } => {
            let mut cfg = cfg;
            if let Some(host) = host {
                cfg.server.host = host;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
