//! Session ledger — the position manager.
//!
//! One `PositionManager` owns every position of a trading session: it
//! assigns identifiers, enforces the capacity bound, routes feed records and
//! close requests, and aggregates balance and equity. Positions are never
//! removed — closed positions stay in the ledger so realized PnL keeps
//! contributing to the balance.

use std::collections::HashMap;

use thiserror::Error;

use crate::clock;
use crate::domain::{Candle, Position, PositionError, PositionId, PositionSpec, Tick, Trade};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no position with identifier {0}")]
    UnknownPosition(PositionId),
}

/// Ledger of every position opened in one trading session.
///
/// The ordered sequence (insertion order = open order) and the identifier
/// index are only ever mutated together, so they cannot diverge.
#[derive(Debug, Clone)]
pub struct PositionManager {
    start_balance: f64,
    max_positions: usize,
    positions: Vec<Position>,
    index: HashMap<PositionId, usize>,
}

impl PositionManager {
    pub fn new(start_balance: f64, max_positions: usize) -> Self {
        Self {
            start_balance,
            max_positions,
            positions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn start_balance(&self) -> f64 {
        self.start_balance
    }

    pub fn max_positions(&self) -> usize {
        self.max_positions
    }

    /// Every position tracked this session, open order preserved.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Positions not yet closed.
    pub fn open_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_open()).count()
    }

    /// Open a new position in the ledger.
    ///
    /// Returns `Ok(None)` when the ledger is at capacity — running out of
    /// slots is an expected session condition, not an error. A supplied
    /// identifier is kept when fresh; a colliding (or absent) one is replaced
    /// by freshly drawn identifiers until unused, never by overwriting the
    /// holder. Construction errors propagate.
    pub fn open(
        &mut self,
        open_date: impl Into<String>,
        spec: PositionSpec,
        identifier: Option<PositionId>,
    ) -> Result<Option<&Position>, PositionError> {
        if self.positions.len() >= self.max_positions {
            return Ok(None);
        }

        let mut id = identifier.unwrap_or_else(PositionId::new);
        while self.index.contains_key(&id) {
            id = PositionId::new();
        }

        let position = Position::new(id, open_date, spec)?;
        self.positions.push(position);
        self.index.insert(id, self.positions.len() - 1);
        Ok(self.positions.last())
    }

    pub fn get_position(&self, id: &PositionId) -> Result<&Position, LedgerError> {
        self.index
            .get(id)
            .map(|&at| &self.positions[at])
            .ok_or(LedgerError::UnknownPosition(*id))
    }

    pub fn get_position_mut(&mut self, id: &PositionId) -> Result<&mut Position, LedgerError> {
        match self.index.get(id) {
            Some(&at) => Ok(&mut self.positions[at]),
            None => Err(LedgerError::UnknownPosition(*id)),
        }
    }

    /// Close one position by identifier, or flatten the whole ledger.
    ///
    /// The close is stamped with the current wall-clock session timestamp.
    /// On the flatten path every tracked position sees the same bid/ask and
    /// stamp; already-closed positions are untouched — close is terminal at
    /// the position level.
    pub fn close(
        &mut self,
        bid: f64,
        ask: f64,
        identifier: Option<&PositionId>,
    ) -> Result<(), LedgerError> {
        let stamp = clock::session_now();
        match identifier {
            Some(id) => self.get_position_mut(id)?.close(stamp, bid, ask),
            None => {
                for position in &mut self.positions {
                    position.close(stamp.clone(), bid, ask);
                }
            }
        }
        Ok(())
    }

    /// Forward a candle to every open position.
    pub fn update_by_candle(&mut self, candle: &Candle) {
        for position in &mut self.positions {
            position.update_by_candle(candle);
        }
    }

    /// Forward a quote to every open position.
    pub fn update_by_tick(&mut self, tick: &Tick) {
        for position in &mut self.positions {
            position.update_by_tick(tick);
        }
    }

    /// Forward a trade print to every open position.
    pub fn update_by_trade(&mut self, trade: &Trade) {
        for position in &mut self.positions {
            position.update_by_trade(trade);
        }
    }

    /// Start balance plus realized PnL — closed positions only.
    pub fn balance(&self) -> f64 {
        self.balance_with(false)
    }

    /// Start balance plus realized and mark-to-market PnL across the ledger.
    pub fn equity(&self) -> f64 {
        self.balance_with(true)
    }

    fn balance_with(&self, include_open: bool) -> f64 {
        let pnl: f64 = self
            .positions
            .iter()
            .filter(|p| include_open || p.is_closed())
            .map(|p| p.pnl)
            .sum();
        self.start_balance + pnl
    }
}
