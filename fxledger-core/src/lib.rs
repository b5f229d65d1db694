//! FxLedger Core — position lifecycle and session ledger.
//!
//! The accounting heart of a backtesting / paper-trading session:
//! - Feed record types (candles, ticks, trade prints)
//! - Position state machine: pip economics, running PnL, stop-loss/target
//!   breach detection, terminal close
//! - PositionManager: capacity-bounded ledger with balance/equity views
//! - Session timestamp formatting

pub mod clock;
pub mod domain;
pub mod ledger;
