//! Configuration management
//!
//! JSON-backed engine configuration with builder-style setters for
//! programmatic use.

use crate::portfolio::RiskLimits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Engine-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Initial cash balance, same denomination as price data.
    #[serde(default = "default_starting_cash")]
    pub starting_cash: f64,
    /// Commission as a fraction of trade notional (e.g. 0.001 = 0.1%).
    #[serde(default)]
    pub commission_rate: f64,
    /// Risk limits applied to every symbol slot at construction.
    #[serde(default)]
    pub default_limits: RiskLimits,
    /// Capacity of the order book's historical ledger.
    #[serde(default = "default_ledger_capacity")]
    pub ledger_capacity: usize,
}

fn default_starting_cash() -> f64 {
    100_000.0
}

fn default_ledger_capacity() -> usize {
    1024
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            commission_rate: 0.0,
            default_limits: RiskLimits::default(),
            ledger_capacity: default_ledger_capacity(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read config file")?;
        serde_json::from_str(&contents).context("Failed to parse config JSON")
    }

    pub fn with_starting_cash(mut self, cash: f64) -> Self {
        self.starting_cash = cash;
        self
    }

    pub fn with_commission_rate(mut self, rate: f64) -> Self {
        self.commission_rate = rate;
        self
    }

    pub fn with_default_limits(mut self, limits: RiskLimits) -> Self {
        self.default_limits = limits;
        self
    }

    pub fn with_ledger_capacity(mut self, capacity: usize) -> Self {
        self.ledger_capacity = capacity;
        self
    }
}
