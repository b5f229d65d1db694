//! Session configuration — TOML-driven session settings and position entries.

use std::path::Path;

use anyhow::{Context, Result};
use fxledger_core::domain::{PositionSpec, Side};
use serde::{Deserialize, Serialize};

/// A full session description: ledger settings plus the positions to open
/// when the feed starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session: SessionSettings,
    #[serde(default)]
    pub positions: Vec<PositionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub start_balance: f64,
    pub max_positions: usize,
}

/// One position to open at session start. Optional fields fall back to the
/// core defaults (standard lot economics, EURUSD).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionEntry {
    pub entry: f64,
    pub lot_size: f64,
    pub side: Side,
    pub target: Option<f64>,
    pub stoploss: Option<f64>,
    pub pair: Option<String>,
    pub contract_size: Option<f64>,
    pub pip_size_factor: Option<f64>,
}

impl SessionConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session config {}", path.display()))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse session config")
    }
}

impl PositionEntry {
    /// Build the core spec, layering per-entry overrides over the defaults.
    pub fn to_spec(&self) -> PositionSpec {
        let mut spec = PositionSpec::new(self.entry, self.lot_size, self.side);
        if let Some(target) = self.target {
            spec = spec.with_target(target);
        }
        if let Some(stoploss) = self.stoploss {
            spec = spec.with_stoploss(stoploss);
        }
        if let Some(pair) = &self.pair {
            spec.pair = pair.clone();
        }
        if let Some(contract_size) = self.contract_size {
            spec.contract_size = contract_size;
        }
        if let Some(factor) = self.pip_size_factor {
            spec.pip_size_factor = factor;
        }
        spec
    }
}
