//! Portfolio and risk manager
//!
//! The central aggregate: one position/risk record per symbol in
//! fixed-capacity arrays indexed by dense symbol id, pre-trade risk gating
//! on signals, fill application with position-reversal semantics, and
//! on-demand portfolio metrics.
//!
//! Hot-path operations (`can_execute`, `on_fill`, `on_market_data`) are
//! array-indexed and branch-light; `compute_metrics` is the designated cold
//! path and scales with the active position count, not the capacity.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{CancelEvent, OrderEvent, OrderSink};
use crate::portfolio::position::{PositionRecord, RiskLimits};
use crate::types::{next_order_id, OrderId, SymbolId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel for "symbol not in the active list".
const NO_SLOT: usize = usize::MAX;

/// Snapshot of portfolio-wide metrics
///
/// A pure projection over the position array; only `realized_pnl` and
/// `total_trades` are accumulated eagerly for O(1) readback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_pnl: f64,
    pub unrealized_pnl: f64,
    pub realized_pnl: f64,
    /// Sum of |quantity * last_price| over open positions.
    pub gross_exposure: f64,
    /// Sum of quantity * last_price over open positions.
    pub net_exposure: f64,
    /// Count of symbols with non-zero quantity.
    pub num_positions: usize,
    /// Count of fills applied.
    pub total_trades: u64,
}

/// One applied fill, as kept in the trade log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: SymbolId,
    pub quantity: i64,
    pub price: f64,
}

/// Tracks positions, cash, P&L, and risk limits for up to `MAX_SYMBOLS` instruments
#[derive(Debug)]
pub struct PortfolioManager<const MAX_SYMBOLS: usize> {
    positions: Box<[PositionRecord]>,
    limits: Box<[RiskLimits]>,
    /// Dense list of non-flat symbols, so metrics skip flat slots.
    active_list: Vec<SymbolId>,
    /// Per-symbol slot into `active_list`, `NO_SLOT` when flat.
    active_slot: Box<[usize]>,
    cash: f64,
    commission_rate: f64,
    realized_pnl: f64,
    total_trades: u64,
    orders_submitted: u64,
    orders_rejected: u64,
    cancel_count: u64,
    cancelled_order_ids: Vec<OrderId>,
    trade_log: Vec<TradeRecord>,
}

impl<const MAX_SYMBOLS: usize> PortfolioManager<MAX_SYMBOLS> {
    /// Create a manager with all symbol slots zero-initialized and default
    /// risk limits.
    pub fn new(starting_cash: f64) -> Self {
        Self {
            positions: vec![PositionRecord::default(); MAX_SYMBOLS].into_boxed_slice(),
            limits: vec![RiskLimits::default(); MAX_SYMBOLS].into_boxed_slice(),
            active_list: Vec::new(),
            active_slot: vec![NO_SLOT; MAX_SYMBOLS].into_boxed_slice(),
            cash: starting_cash,
            commission_rate: 0.0,
            realized_pnl: 0.0,
            total_trades: 0,
            orders_submitted: 0,
            orders_rejected: 0,
            cancel_count: 0,
            cancelled_order_ids: Vec::new(),
            trade_log: Vec::new(),
        }
    }

    /// Create a manager from configuration.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut manager = Self::new(config.starting_cash);
        manager.commission_rate = config.commission_rate;
        manager.limits.fill(config.default_limits);
        manager
    }

    /// Pre-trade risk check. Read-only, no side effects.
    ///
    /// All four checks are evaluated unconditionally and combined with
    /// bitwise AND; no short-circuiting on the hot path.
    pub fn can_execute(
        &self,
        symbol: SymbolId,
        quantity: i64,
        price: f64,
    ) -> Result<bool, EngineError> {
        let idx = self.check_symbol(symbol)?;
        check_order(quantity, price)?;

        let pos = &self.positions[idx];
        let limits = &self.limits[idx];
        let new_position = pos.quantity + pos.pending_quantity + quantity;

        let within_order_size = quantity.abs() <= limits.max_order_size;
        let within_position = new_position.abs() <= limits.max_position;
        let within_notional = new_position.abs() as f64 * price <= limits.max_notional;
        // Reducing/short trades never require cash; buys must be fundable.
        let cash_ok = (quantity <= 0) | (quantity as f64 * price <= self.cash);

        Ok(within_order_size & within_position & within_notional & cash_ok)
    }

    /// Risk-gate a trading signal and emit the order on success.
    ///
    /// Returns `Ok(true)` when the order was emitted, `Ok(false)` on a risk
    /// rejection (counted, no state change). Accepted signals reserve their
    /// quantity in `pending_quantity` and are assigned a fresh order id.
    pub fn on_signal<S: OrderSink>(
        &mut self,
        symbol: SymbolId,
        quantity: i64,
        price: f64,
        timestamp_ns: i64,
        sink: &mut S,
    ) -> Result<bool, EngineError> {
        let idx = self.check_symbol(symbol)?;
        check_order(quantity, price)?;

        if !self.can_execute(symbol, quantity, price)? {
            self.orders_rejected += 1;
            debug!(symbol, quantity, price, "signal rejected by risk checks");
            return Ok(false);
        }

        self.positions[idx].pending_quantity += quantity;

        let order_id = next_order_id();
        sink.submit(OrderEvent {
            order_id,
            symbol,
            quantity,
            price,
            timestamp_ns,
        });
        self.orders_submitted += 1;
        Ok(true)
    }

    /// Reserve quantity directly, without the signal path.
    pub fn add_pending(&mut self, symbol: SymbolId, quantity: i64) -> Result<(), EngineError> {
        let idx = self.check_symbol(symbol)?;
        self.positions[idx].pending_quantity += quantity;
        Ok(())
    }

    /// Apply an executed trade to the position and cash state.
    ///
    /// `quantity` is signed: a buy reduces cash, a sell increases it.
    /// Releases the pending reservation, realizes P&L on closing quantity,
    /// and maintains the cost basis: reversal resets it to the fill price,
    /// a pure reduction leaves it untouched, same-side adds re-average it.
    pub fn on_fill(
        &mut self,
        symbol: SymbolId,
        quantity: i64,
        price: f64,
    ) -> Result<(), EngineError> {
        let idx = self.check_symbol(symbol)?;
        check_order(quantity, price)?;

        let pos = &mut self.positions[idx];
        // May go negative when a fill outruns its signal; observable, not clamped.
        pos.pending_quantity -= quantity;

        let old_qty = pos.quantity;
        let new_qty = old_qty + quantity;
        let is_closing = old_qty != 0 && old_qty.signum() != quantity.signum();

        if is_closing {
            let closed_qty = quantity.abs().min(old_qty.abs());
            let realized = closed_qty as f64 * old_qty.signum() as f64 * (price - pos.average_cost);
            pos.realized_pnl += realized;
            self.realized_pnl += realized;

            let reversed = new_qty != 0 && old_qty.signum() != new_qty.signum();
            if reversed {
                // Fresh cost basis on the new side.
                pos.average_cost = price;
            }
            // Partial or full close without reversal keeps the old basis;
            // it is only meaningful again once the position reopens.
        } else {
            // Adding to the same side (or opening from flat): re-average.
            pos.average_cost =
                (old_qty as f64 * pos.average_cost + quantity as f64 * price) / new_qty as f64;
        }
        pos.quantity = new_qty;

        let trade_value = quantity as f64 * price;
        self.cash -= trade_value;
        self.cash -= trade_value.abs() * self.commission_rate;
        self.total_trades += 1;
        self.trade_log.push(TradeRecord {
            symbol,
            quantity,
            price,
        });

        self.set_active(idx, new_qty != 0);
        Ok(())
    }

    /// Store the latest market price for mark-to-market. No P&L effects.
    pub fn on_market_data(&mut self, symbol: SymbolId, price: f64) -> Result<(), EngineError> {
        let idx = self.check_symbol(symbol)?;
        if !price.is_finite() || price <= 0.0 {
            return Err(EngineError::InvalidPrice(price));
        }
        self.positions[idx].last_price = price;
        Ok(())
    }

    /// Record a cancelled order. No position effects.
    pub fn on_cancel(&mut self, cancel: &CancelEvent) {
        self.cancel_count += 1;
        self.cancelled_order_ids.push(cancel.order_id);
        debug!(order_id = cancel.order_id, symbol = cancel.symbol, "order cancel recorded");
    }

    /// Compute the portfolio-wide metrics snapshot.
    ///
    /// Cold path: iterates only active (non-flat) symbols.
    pub fn compute_metrics(&self) -> PortfolioMetrics {
        let mut metrics = PortfolioMetrics {
            realized_pnl: self.realized_pnl,
            total_trades: self.total_trades,
            ..Default::default()
        };

        for &symbol in &self.active_list {
            let pos = &self.positions[symbol as usize];
            let notional = pos.notional();
            metrics.unrealized_pnl += pos.unrealized_pnl();
            metrics.gross_exposure += notional.abs();
            metrics.net_exposure += notional;
            metrics.num_positions += 1;
        }

        metrics.total_pnl = metrics.realized_pnl + metrics.unrealized_pnl;
        metrics
    }

    /// Get a symbol's position record.
    pub fn position(&self, symbol: SymbolId) -> Result<&PositionRecord, EngineError> {
        let idx = self.check_symbol(symbol)?;
        Ok(&self.positions[idx])
    }

    /// Get a symbol's risk limits.
    pub fn risk_limit(&self, symbol: SymbolId) -> Result<&RiskLimits, EngineError> {
        let idx = self.check_symbol(symbol)?;
        Ok(&self.limits[idx])
    }

    /// Configure a symbol's risk limits.
    pub fn set_risk_limit(
        &mut self,
        symbol: SymbolId,
        limits: RiskLimits,
    ) -> Result<(), EngineError> {
        let idx = self.check_symbol(symbol)?;
        self.limits[idx] = limits;
        Ok(())
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash
    }

    /// Cash plus the marked value of all open positions.
    pub fn total_equity(&self) -> f64 {
        let mut equity = self.cash;
        for &symbol in &self.active_list {
            equity += self.positions[symbol as usize].notional();
        }
        equity
    }

    /// Mark-to-market P&L across open positions.
    pub fn unrealized_pnl(&self) -> f64 {
        self.active_list
            .iter()
            .map(|&symbol| self.positions[symbol as usize].unrealized_pnl())
            .sum()
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    /// Symbols with a non-zero quantity, in no particular order.
    pub fn active_symbols(&self) -> &[SymbolId] {
        &self.active_list
    }

    pub fn orders_submitted(&self) -> u64 {
        self.orders_submitted
    }

    pub fn orders_rejected(&self) -> u64 {
        self.orders_rejected
    }

    pub fn total_trades(&self) -> u64 {
        self.total_trades
    }

    pub fn cancel_count(&self) -> u64 {
        self.cancel_count
    }

    pub fn cancelled_order_ids(&self) -> &[OrderId] {
        &self.cancelled_order_ids
    }

    pub fn trade_log(&self) -> &[TradeRecord] {
        &self.trade_log
    }

    #[inline]
    fn check_symbol(&self, symbol: SymbolId) -> Result<usize, EngineError> {
        let idx = symbol as usize;
        if idx >= MAX_SYMBOLS {
            return Err(EngineError::SymbolOutOfRange {
                id: symbol,
                capacity: MAX_SYMBOLS,
            });
        }
        Ok(idx)
    }

    /// Maintain the dense active list with O(1) insert and swap-remove.
    fn set_active(&mut self, idx: usize, active: bool) {
        let slot = self.active_slot[idx];
        if active && slot == NO_SLOT {
            self.active_slot[idx] = self.active_list.len();
            self.active_list.push(idx as SymbolId);
        } else if !active && slot != NO_SLOT {
            self.active_list.swap_remove(slot);
            self.active_slot[idx] = NO_SLOT;
            if let Some(&moved) = self.active_list.get(slot) {
                self.active_slot[moved as usize] = slot;
            }
        }
    }
}

#[inline]
fn check_order(quantity: i64, price: f64) -> Result<(), EngineError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(EngineError::InvalidPrice(price));
    }
    if quantity == 0 {
        return Err(EngineError::ZeroQuantity);
    }
    Ok(())
}
