//! Feed replay — stream candles through a session ledger.

use std::path::Path;

use anyhow::{Context, Result};
use fxledger_core::clock;
use fxledger_core::domain::Candle;
use fxledger_core::ledger::PositionManager;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::SessionConfig;

/// Outcome of one replayed session.
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub bars: usize,
    pub skipped: usize,
    pub opened: usize,
    pub closed_by_feed: usize,
    pub flattened: usize,
    pub balance: f64,
    pub equity: f64,
}

/// Load candles from a CSV feed with `Date,Open,High,Low,Close,Volume`
/// headers. Rows failing the OHLC sanity check are dropped and counted.
pub fn load_candles(path: &Path) -> Result<(Vec<Candle>, usize)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open candle feed {}", path.display()))?;

    let mut candles = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize() {
        let candle: Candle = row.context("malformed candle row")?;
        if candle.is_sane() {
            candles.push(candle);
        } else {
            skipped += 1;
        }
    }
    Ok((candles, skipped))
}

/// Deterministic random-walk candle series for offline sessions.
pub fn synthetic_candles(seed: u64, bars: usize, start_price: f64) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = start_price;
    let mut candles = Vec::with_capacity(bars);

    for bar in 0..bars {
        let open = price;
        let drift: f64 = rng.gen_range(-0.002..0.002);
        let close = (open * (1.0 + drift)).max(0.0001);
        let span: f64 = rng.gen_range(0.0..0.0015);
        let high = open.max(close) * (1.0 + span);
        let low = (open.min(close) * (1.0 - span)).max(0.00005);
        let date = format!(
            "01/01/2024, {:02}:{:02}:{:02}",
            (bar / 3600) % 24,
            (bar / 60) % 60,
            bar % 60
        );
        candles.push(Candle {
            date,
            open,
            high,
            low,
            close,
            volume: 1_000.0,
        });
        price = close;
    }
    candles
}

/// Open every configured position, stream the candle feed through the
/// ledger, then flatten whatever survived at the last seen close.
pub fn run_replay(
    config: &SessionConfig,
    candles: &[Candle],
    skipped: usize,
) -> Result<SessionSummary> {
    let mut manager = PositionManager::new(
        config.session.start_balance,
        config.session.max_positions,
    );

    let open_stamp = candles
        .first()
        .map(|c| c.date.clone())
        .unwrap_or_else(clock::session_now);

    let mut opened = 0usize;
    for entry in &config.positions {
        if manager.open(open_stamp.clone(), entry.to_spec(), None)?.is_some() {
            opened += 1;
        }
    }

    for candle in candles {
        manager.update_by_candle(candle);
    }

    let closed_by_feed = manager.positions().iter().filter(|p| p.is_closed()).count();

    let mut flattened = 0usize;
    if let Some(last) = candles.last() {
        flattened = manager.open_count();
        manager.close(last.close, last.close, None)?;
    }

    Ok(SessionSummary {
        bars: candles.len(),
        skipped,
        opened,
        closed_by_feed,
        flattened,
        balance: manager.balance(),
        equity: manager.equity(),
    })
}
