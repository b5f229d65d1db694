//! FxLedger CLI — replay a candle feed through a session ledger.
//!
//! Commands:
//! - `replay` — stream a CSV candle feed through a configured session
//! - `synthetic` — run the same loop over a seeded random-walk series

mod config;
mod replay;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::SessionConfig;
use crate::replay::{load_candles, run_replay, synthetic_candles, SessionSummary};

#[derive(Parser)]
#[command(name = "fxledger", about = "FxLedger — session ledger replay driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a CSV candle feed (Date,Open,High,Low,Close,Volume) through a session.
    Replay {
        /// Path to the candle CSV.
        #[arg(long)]
        csv: PathBuf,

        /// Path to the session TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Print the summary as JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a session over a deterministic synthetic random walk.
    Synthetic {
        /// Path to the session TOML config.
        #[arg(long)]
        config: PathBuf,

        /// RNG seed for the walk.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of candles to generate.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        /// First candle's open price.
        #[arg(long, default_value_t = 1.0)]
        start_price: f64,

        /// Print the summary as JSON instead of the text report.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { csv, config, json } => {
            let session = SessionConfig::from_file(&config)?;
            let (candles, skipped) = load_candles(&csv)?;
            let summary = run_replay(&session, &candles, skipped)?;
            report(&summary, json)
        }
        Commands::Synthetic {
            config,
            seed,
            bars,
            start_price,
            json,
        } => {
            let session = SessionConfig::from_file(&config)?;
            let candles = synthetic_candles(seed, bars, start_price);
            let summary = run_replay(&session, &candles, 0)?;
            report(&summary, json)
        }
    }
}

fn report(summary: &SessionSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!();
    println!("=== Session Result ===");
    println!("Bars:           {}", summary.bars);
    if summary.skipped > 0 {
        println!("Skipped rows:   {}", summary.skipped);
    }
    println!("Opened:         {}", summary.opened);
    println!("Closed by feed: {}", summary.closed_by_feed);
    println!("Flattened:      {}", summary.flattened);
    println!();
    println!("--- Accounting ---");
    println!("Balance:        {:.2}", summary.balance);
    println!("Equity:         {:.2}", summary.equity);
    println!();
    Ok(())
}
