//! Position — one trade's economics and lifecycle.
//!
//! A position is opened with its risk configuration validated up front,
//! marked to market by every feed record it sees, and closed exactly once —
//! either explicitly or when a record crosses its stop-loss or target.
//! Closed positions are inert: no later feed event touches their PnL.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::PositionId;
use super::market::{Candle, Tick, Trade};
use super::pips;

/// Which way the position is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

/// Spot holding or a dated future. Descriptive only — never enters the math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Spot,
    Future,
}

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("{side:?} position: stop-loss {stoploss} cannot sit beyond target {target}")]
    StopBeyondTarget {
        side: Side,
        stoploss: f64,
        target: f64,
    },

    #[error("entry price must be positive, got {entry}")]
    NonPositiveEntry { entry: f64 },

    #[error("risk/reward requires both a target and a stop-loss")]
    MissingRiskBounds,

    #[error("risk/reward undefined: stop-loss sits exactly at entry")]
    ZeroRiskDistance,
}

/// Economics and classification handed to position construction.
///
/// `new` fills the session defaults (standard 100k contract, fourth-decimal
/// pip, EURUSD on Oanda); thresholds are attached explicitly. A non-positive
/// threshold means "not configured" and never participates in ordering or
/// breach checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSpec {
    pub entry: f64,
    pub lot_size: f64,
    pub side: Side,
    pub target: Option<f64>,
    pub stoploss: Option<f64>,
    pub contract_size: f64,
    pub pip_size_factor: f64,
    pub market: String,
    pub exchange: String,
    pub pair: String,
    pub kind: AssetKind,
}

impl PositionSpec {
    pub fn new(entry: f64, lot_size: f64, side: Side) -> Self {
        Self {
            entry,
            lot_size,
            side,
            target: None,
            stoploss: None,
            contract_size: 100_000.0,
            pip_size_factor: 0.01,
            market: "Forex".to_string(),
            exchange: "Oanda".to_string(),
            pair: "EURUSD".to_string(),
            kind: AssetKind::Future,
        }
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = normalize_threshold(Some(target));
        self
    }

    pub fn with_stoploss(mut self, stoploss: f64) -> Self {
        self.stoploss = normalize_threshold(Some(stoploss));
        self
    }
}

/// Non-positive threshold values mean "no threshold configured".
fn normalize_threshold(level: Option<f64>) -> Option<f64> {
    level.filter(|lvl| *lvl > 0.0)
}

/// One trade: entry economics, running PnL, and the open → closed transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub market: String,
    pub exchange: String,
    pub pair: String,
    pub kind: AssetKind,
    pub side: Side,
    pub entry: f64,
    pub target: Option<f64>,
    pub stoploss: Option<f64>,
    pub lot_size: f64,
    pub contract_size: f64,
    pub pip_size_factor: f64,
    pub pnl: f64,
    pub open_date: String,
    pub close_date: Option<String>,
}

impl Position {
    /// Validate the risk configuration before the position exists.
    ///
    /// A Buy stop must sit at or below its target and a Sell stop at or
    /// above; the entry must be positive so pip economics stay defined.
    /// A position never comes into existence in an invalid configuration.
    pub fn new(
        id: PositionId,
        open_date: impl Into<String>,
        spec: PositionSpec,
    ) -> Result<Self, PositionError> {
        let PositionSpec {
            entry,
            lot_size,
            side,
            target,
            stoploss,
            contract_size,
            pip_size_factor,
            market,
            exchange,
            pair,
            kind,
        } = spec;

        if entry <= 0.0 {
            return Err(PositionError::NonPositiveEntry { entry });
        }

        let target = normalize_threshold(target);
        let stoploss = normalize_threshold(stoploss);

        if let (Some(tg), Some(sl)) = (target, stoploss) {
            let inverted = match side {
                Side::Buy => sl > tg,
                Side::Sell => sl < tg,
            };
            if inverted {
                return Err(PositionError::StopBeyondTarget {
                    side,
                    stoploss: sl,
                    target: tg,
                });
            }
        }

        Ok(Self {
            id,
            market,
            exchange,
            pair,
            kind,
            side,
            entry,
            target,
            stoploss,
            lot_size,
            contract_size,
            pip_size_factor,
            pnl: 0.0,
            open_date: open_date.into(),
            close_date: None,
        })
    }

    pub fn is_open(&self) -> bool {
        self.close_date.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.close_date.is_some()
    }

    /// Smallest quoted increment for this market.
    pub fn pip_size(&self) -> f64 {
        pips::pip_size(self.pip_size_factor)
    }

    /// Monetary value of a one-pip move at this position's size.
    ///
    /// Recomputed from the position's own fields on every call, never cached.
    pub fn pip_value(&self) -> f64 {
        pips::pip_value(self.entry, self.pip_size(), self.lot_size, self.contract_size)
    }

    /// Directional PnL in account currency for the given quote.
    ///
    /// Buys are valued against the bid, sells against the ask. Pure — the
    /// stored `pnl` is only assigned by the update and close paths, all of
    /// which route through here.
    pub fn get_pnl(&self, bid: f64, ask: f64) -> f64 {
        let pip_value = self.pip_value();
        let pips_moved = match self.side {
            Side::Buy => (bid - self.entry) / self.pip_size(),
            Side::Sell => (self.entry - ask) / self.pip_size(),
        };
        pips::round_dp(pips_moved * pip_value, 5)
    }

    /// How many times a winning exit recovers the configured risk.
    ///
    /// Above 1.0 one winner repays a full loss; below 1.0 it takes several.
    pub fn risk_reward_ratio(&self) -> Result<f64, PositionError> {
        let (target, stoploss) = match (self.target, self.stoploss) {
            (Some(tg), Some(sl)) => (tg, sl),
            _ => return Err(PositionError::MissingRiskBounds),
        };
        let risk = self.entry - stoploss;
        if risk == 0.0 {
            return Err(PositionError::ZeroRiskDistance);
        }
        Ok(pips::round_dp(((self.entry - target) / risk).abs(), 2))
    }

    /// Terminal transition: stamp the close date and settle PnL at the given
    /// quote. A second close is a no-op — close is terminal.
    pub fn close(&mut self, close_date: impl Into<String>, bid: f64, ask: f64) {
        if self.is_closed() {
            return;
        }
        self.pnl = self.get_pnl(bid, ask);
        self.close_date = Some(close_date.into());
    }

    /// Mark to the candle close, then check thresholds against the bar range.
    ///
    /// The stop-loss is checked before the target: when one candle spans both
    /// levels the loss wins, since a bar cannot say in which order its
    /// extremes printed. Fills are assumed exactly at the threshold price.
    pub fn update_by_candle(&mut self, candle: &Candle) {
        if self.is_closed() {
            return;
        }
        self.pnl = self.get_pnl(candle.close, candle.close);

        match self.side {
            Side::Buy => {
                if let Some(sl) = self.stoploss.filter(|sl| candle.low <= *sl) {
                    self.settle(candle.date.clone(), sl);
                } else if let Some(tg) = self.target.filter(|tg| candle.high >= *tg) {
                    self.settle(candle.date.clone(), tg);
                }
            }
            Side::Sell => {
                if let Some(sl) = self.stoploss.filter(|sl| candle.high >= *sl) {
                    self.settle(candle.date.clone(), sl);
                } else if let Some(tg) = self.target.filter(|tg| candle.low <= *tg) {
                    self.settle(candle.date.clone(), tg);
                }
            }
        }
    }

    /// Mark to the live quote, closing at the observed bid/ask on a breach.
    ///
    /// Unlike bars and prints, a quote is an actual tradeable price, so a
    /// breached position closes at the prevailing market rather than at an
    /// assumed exact fill on the threshold.
    pub fn update_by_tick(&mut self, tick: &Tick) {
        if self.is_closed() {
            return;
        }
        self.pnl = self.get_pnl(tick.bid, tick.ask);

        let breached = match self.side {
            Side::Buy => {
                self.stoploss.is_some_and(|sl| tick.bid <= sl)
                    || self.target.is_some_and(|tg| tick.bid >= tg)
            }
            Side::Sell => {
                self.stoploss.is_some_and(|sl| tick.ask >= sl)
                    || self.target.is_some_and(|tg| tick.ask <= tg)
            }
        };
        if breached {
            self.close_date = Some(tick.date.clone());
        }
    }

    /// Mark to a trade print, using its single price as both quote sides.
    ///
    /// Threshold checks follow the candle semantics: a print carries no
    /// spread, so a breach fills at the threshold itself, stop first.
    pub fn update_by_trade(&mut self, trade: &Trade) {
        if self.is_closed() {
            return;
        }
        self.pnl = self.get_pnl(trade.price, trade.price);

        match self.side {
            Side::Buy => {
                if let Some(sl) = self.stoploss.filter(|sl| trade.price <= *sl) {
                    self.settle(trade.date.clone(), sl);
                } else if let Some(tg) = self.target.filter(|tg| trade.price >= *tg) {
                    self.settle(trade.date.clone(), tg);
                }
            }
            Side::Sell => {
                if let Some(sl) = self.stoploss.filter(|sl| trade.price >= *sl) {
                    self.settle(trade.date.clone(), sl);
                } else if let Some(tg) = self.target.filter(|tg| trade.price <= *tg) {
                    self.settle(trade.date.clone(), tg);
                }
            }
        }
    }

    /// Close at an assumed exact fill on `level` (bar/print semantics).
    fn settle(&mut self, close_date: String, level: f64) {
        self.pnl = self.get_pnl(level, level);
        self.close_date = Some(close_date);
    }
}
