//! Settle CLI - print the board and who pays whom for a saved session.
//!
//! Reads the JSON document written by the scoreboard's file store; never
//! modifies it.

mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scoreboard::repos::SessionStore;
use scoreboard::{telemetry, BoardView, JsonFileStore, SessionConfig};
use tracing::{debug, info};

use output::{ScoresReport, TableRenderer};

#[derive(Parser)]
#[command(name = "settle")]
#[command(about = "Show totals, net balances and settlement for a saved session")]
struct Args {
    /// Path to the session document; defaults to SCOREBOARD_STATE_PATH
    #[arg(long)]
    state: Option<PathBuf>,

    /// Override the stored points-to-currency multiplier
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    unit: Option<i64>,

    /// Output format
    #[arg(long, default_value = "table")]
    format: Format,

    /// Settle raw round points only, ignoring bills and the multiplier
    #[arg(long)]
    scores_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Quiet by default; diagnostics go to stderr so stdout stays parseable.
    telemetry::init_tracing_with(if args.verbose { "debug" } else { "warn" });

    let config = resolve_config(args.state.clone(), SessionConfig::from_env()?);
    let store = JsonFileStore::from_config(&config)?;
    let mut state = store
        .load()
        .await?
        .ok_or_else(|| format!("no session document at {}", store.path().display()))?;
    info!(
        path = %store.path().display(),
        players = state.players.len(),
        rounds = state.results.len(),
        "Loaded session"
    );

    if let Some(unit) = args.unit {
        debug!(stored = state.setting.unit_multiplier, unit, "Overriding unit multiplier");
        state.setting.unit_multiplier = unit;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.scores_only {
        let report = ScoresReport::build(&state)?;
        match args.format {
            Format::Table => TableRenderer::new(&mut out).scores(&report)?,
            Format::Json => serde_json::to_writer_pretty(&mut out, &report)?,
        }
    } else {
        let board = BoardView::build(&state, 0)?;
        match args.format {
            Format::Table => TableRenderer::new(&mut out).board(&board)?,
            Format::Json => serde_json::to_writer_pretty(&mut out, &board)?,
        }
    }
    writeln!(out)?;
    Ok(())
}

/// `--state` wins over the environment's state path.
fn resolve_config(state: Option<PathBuf>, config: SessionConfig) -> SessionConfig {
    match state {
        Some(path) => config.with_state_path(path),
        None => config,
    }
}
