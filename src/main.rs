//! # Sentiscope CLI (`senti`)
//!
//! The `senti` binary is the primary interface for Sentiscope. It starts
//! the HTTP server and provides one-shot commands that exercise the same
//! library code paths from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! senti --config ./config/sentiscope.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `senti serve` | Start the HTTP API server |
//! | `senti analyze "<text>"` | Analyze a text and print the result as JSON |
//! | `senti summarize "<text>"` | Summarize a text and print the result as JSON |
//! | `senti history list` | Print the full history log as JSON |
//! | `senti history delete <timestamp>` | Delete history entries by timestamp |
//!
//! ## Examples
//!
//! ```bash
//! # Start the server
//! senti serve --config ./config/sentiscope.toml
//!
//! # One-shot analysis against the configured model sidecar
//! senti analyze "The phone is great. The screen cracked."
//!
//! # Inspect and prune the history log
//! senti history list
//! senti history delete "2026-08-07 12:00:00"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sentiscope::history::HistoryStore;
use sentiscope::inference::InferenceStack;
use sentiscope::{analyze, config, server, summarize};

/// Sentiscope CLI — a sentiment analysis and summarization service with
/// a file-backed history log.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/sentiscope.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "senti",
    about = "Sentiscope — a sentiment analysis and summarization service",
    version,
    long_about = "Sentiscope analyzes text with an external sentiment classifier and \
    segmenter, summarizes long text, and persists results to a file-backed history log. \
    It exposes the same operations over HTTP (senti serve) and as one-shot CLI commands."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/sentiscope.toml`. All server, history, and
    /// inference settings are read from this file.
    #[arg(long, global = true, default_value = "./config/sentiscope.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves the
    /// analysis, summarization, and history endpoints.
    Serve,

    /// Analyze a text and print the composite result as JSON.
    ///
    /// Runs the whole-text classification, segmentation, and per-sentence
    /// classification against the configured model sidecar.
    Analyze {
        /// The text to analyze.
        text: String,
    },

    /// Summarize a text and print the result as JSON.
    ///
    /// Text of 100 words or fewer is returned unchanged; longer text is
    /// condensed by the configured summarizer.
    Summarize {
        /// The text to summarize.
        text: String,
    },

    /// Inspect and prune the history log.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

/// History management subcommands.
#[derive(Subcommand)]
enum HistoryAction {
    /// Print the full history log as JSON, in append order.
    List,

    /// Delete every history entry with the given timestamp.
    ///
    /// Timestamps are the `YYYY-MM-DD HH:MM:SS` strings shown by
    /// `senti history list`. Entries saved within the same second share a
    /// timestamp and are deleted together.
    Delete {
        /// Timestamp key of the entries to delete.
        timestamp: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so one-shot commands keep stdout clean for JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Analyze { text } => {
            let stack = InferenceStack::from_config(&cfg.inference)?;
            let result = analyze::analyze_text(&stack, &text).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Summarize { text } => {
            let stack = InferenceStack::from_config(&cfg.inference)?;
            let result = summarize::summarize_text(stack.summarizer.as_ref(), &text).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::History { action } => {
            let store = HistoryStore::new(&cfg.history.path);
            match action {
                HistoryAction::List => {
                    let log = store.list()?;
                    println!("{}", serde_json::to_string_pretty(&log)?);
                }
                HistoryAction::Delete { timestamp } => {
                    let removed = store.delete(&timestamp)?;
                    println!("Deleted {} entries.", removed);
                }
            }
        }
    }

    Ok(())
}
