//! Feed record types — candles, ticks, and trade prints.
//!
//! Three distinct record shapes because upstream data granularity varies
//! (bars vs. quotes vs. prints). Each update entry point on a position reads
//! exactly one of these; fixed fields at the type level replace field-name
//! lookups into loosely shaped feed payloads.
//!
//! Serde names mirror the feed's column headers (`Date,Open,High,Low,Close`,
//! `Bid/Ask`, `Price`) so CSV and JSON feeds deserialize without adapters.

use serde::{Deserialize, Serialize};

/// OHLCV candle for one bar interval.
///
/// `open` and `volume` are carried for the record shape but unused by
/// position updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume", default)]
    pub volume: f64,
}

impl Candle {
    /// Basic OHLC sanity check: the range must contain open and close, and
    /// the close must be a usable price. Replay drivers skip rows failing it.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }
}

/// Top-of-book quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Bid")]
    pub bid: f64,
    #[serde(rename = "Ask")]
    pub ask: f64,
}

/// Executed trade print — a single traded price, no spread information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Price")]
    pub price: f64,
}
