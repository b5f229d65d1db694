//! Domain types for FxLedger.

pub mod ids;
pub mod market;
pub mod pips;
pub mod position;

pub use ids::PositionId;
pub use market::{Candle, Tick, Trade};
pub use position::{AssetKind, Position, PositionError, PositionSpec, Side};
