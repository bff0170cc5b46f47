//! Per-instrument position and risk records
//!
//! Pure data, no behavior beyond trivial projections. One of each lives in
//! the portfolio manager's fixed-capacity arrays for every symbol slot.

use serde::{Deserialize, Serialize};

/// Position state for a single instrument
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Net quantity: positive for long, negative for short, zero if flat.
    pub quantity: i64,
    /// Quantity reserved by risk-approved orders not yet filled. May go
    /// negative transiently when fills arrive before their signal.
    pub pending_quantity: i64,
    /// Weighted average entry price of the open side. Meaningful only while
    /// `quantity != 0`.
    pub average_cost: f64,
    /// Realized profit or loss accumulated from closed trades. Never reset.
    pub realized_pnl: f64,
    /// Last observed market price, for mark-to-market.
    pub last_price: f64,
}

impl PositionRecord {
    pub fn is_flat(&self) -> bool {
        self.quantity == 0
    }

    /// Mark-to-market P&L of the open quantity. Zero when flat.
    pub fn unrealized_pnl(&self) -> f64 {
        self.quantity as f64 * (self.last_price - self.average_cost)
    }

    /// Signed market value of the open quantity.
    pub fn notional(&self) -> f64 {
        self.quantity as f64 * self.last_price
    }
}

/// Pre-trade risk limits, independently configurable per symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Absolute cap on |current + pending + proposed| quantity.
    pub max_position: i64,
    /// Absolute cap on a single proposed order's quantity.
    pub max_order_size: i64,
    /// Cap on |new position| * price.
    pub max_notional: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position: 1000,
            max_order_size: 100,
            max_notional: 1e6,
        }
    }
}
