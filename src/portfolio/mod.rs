//! Portfolio state: positions, cash, P&L, and pre-trade risk

pub mod manager;
pub mod position;

pub use manager::{PortfolioManager, PortfolioMetrics, TradeRecord};
pub use position::{PositionRecord, RiskLimits};
