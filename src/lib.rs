//! Trading engine core
//!
//! The state-tracking and risk-gating core of an algorithmic trading engine:
//! per-instrument position and cash state, pre-trade risk limits, aggregate
//! P&L and exposure metrics, and a price/time-priority order book with O(1)
//! id lookup and cancellation.
//!
//! Symbol-keyed state lives in fixed-capacity arrays indexed by dense
//! integer ids, so the hot path (`can_execute`, `on_fill`,
//! `on_market_data`) is array accesses with per-call latencies measured in
//! nanoseconds (see `benches/performance.rs`). The core is single-threaded
//! and synchronous; the only concurrency primitive is the atomic order-id
//! counter.
//!
//! # Example
//! ```
//! use trading_core::{PortfolioManager, RiskLimits, OrderEvent};
//!
//! let mut pm: PortfolioManager<64> = PortfolioManager::new(100_000.0);
//! pm.set_risk_limit(0, RiskLimits { max_position: 500, max_order_size: 100, max_notional: 1e6 })?;
//!
//! let mut orders: Vec<OrderEvent> = Vec::new();
//! if pm.on_signal(0, 100, 50.0, 0, &mut orders)? {
//!     // order emitted; apply the execution result
//!     pm.on_fill(0, 100, 50.0)?;
//! }
//! assert_eq!(pm.position(0)?.quantity, 100);
//! # Ok::<(), trading_core::EngineError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod orders;
pub mod portfolio;
pub mod types;

pub use config::EngineConfig;
pub use engine::{Engine, MarketStream, Strategy};
pub use error::EngineError;
pub use events::{
    CancelEvent, Event, EventQueue, FillEvent, MarketEvent, OrderEvent, OrderSink, SignalEvent,
};
pub use orders::{ExecutionHandler, FillTracker, OrderBook, OrderState, RecencyBuffer};
pub use portfolio::{PortfolioManager, PortfolioMetrics, PositionRecord, RiskLimits, TradeRecord};
pub use types::{next_order_id, now_ns, OrderId, Side, SymbolId};
