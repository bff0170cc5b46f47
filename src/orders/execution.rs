//! Execution-side fill tracking
//!
//! Maintains per-order cumulative fill state atop the order book and emits
//! fill/cancel events back into the dispatch queue. Concrete execution
//! handlers (backtest simulator, venue gateway) implement
//! [`ExecutionHandler`] and drive a [`FillTracker`].

use crate::events::{CancelEvent, Event, EventQueue, FillEvent, MarketEvent, OrderEvent};
use crate::orders::book::{OrderBook, OrderState, DEFAULT_LEDGER_CAPACITY};
use crate::types::OrderId;
use tracing::debug;

/// Execution handler capability
///
/// The dispatcher routes order events here; `on_market` is optional and lets
/// simulated venues match resting orders against ticks.
pub trait ExecutionHandler {
    fn on_order(&mut self, order: &OrderEvent, queue: &mut EventQueue);

    fn on_market(&mut self, event: &MarketEvent, queue: &mut EventQueue) {
        let _ = (event, queue);
    }
}

/// Tracks cumulative fills per order and their lifecycle in the book
#[derive(Debug, Default)]
pub struct FillTracker {
    book: OrderBook,
}

impl FillTracker {
    pub fn new() -> Self {
        Self::with_ledger_capacity(DEFAULT_LEDGER_CAPACITY)
    }

    pub fn with_ledger_capacity(capacity: usize) -> Self {
        Self {
            book: OrderBook::with_ledger_capacity(capacity),
        }
    }

    /// Admit a working order into the book.
    pub fn track(&mut self, order: OrderEvent) {
        self.book.emplace(order);
    }

    /// Lookup an order's fill state by id.
    pub fn order(&self, id: OrderId) -> Option<&OrderState> {
        self.book.get(id)
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn book_mut(&mut self) -> &mut OrderBook {
        &mut self.book
    }

    /// Apply an execution to an order and emit the fill event.
    ///
    /// Unseen order ids are initialized from the originating order with zero
    /// progress. Once cumulative filled quantity reaches the order's total,
    /// the record is retired to the book's historical ledger.
    pub fn apply_fill(
        &mut self,
        order: &OrderEvent,
        filled_quantity: i64,
        exec_price: f64,
        timestamp_ns: i64,
        queue: &mut EventQueue,
    ) {
        if self.book.get(order.order_id).is_none() {
            self.book.emplace(*order);
        }

        let mut complete = false;
        if let Some(state) = self.book.get_mut(order.order_id) {
            state.filled_quantity += filled_quantity;

            if state.filled_quantity > 0 {
                let prior = (state.filled_quantity - filled_quantity) as f64;
                state.avg_fill_price = (state.avg_fill_price * prior
                    + exec_price * filled_quantity as f64)
                    / state.filled_quantity as f64;
            } else {
                state.avg_fill_price = 0.0; // guard for zero division
            }

            complete = state.filled_quantity >= state.order.quantity.abs();
        }

        if complete {
            self.book.inactive(order.order_id);
            debug!(order_id = order.order_id, "order fully filled");
        }

        queue.push(Event::Fill(FillEvent {
            symbol: order.symbol,
            order_id: order.order_id,
            filled_quantity,
            order_quantity: order.quantity.abs(),
            side: order.side(),
            price: exec_price,
            timestamp_ns,
        }));
    }

    /// Cancel an order immediately and emit the cancel event.
    ///
    /// Used for IOC/FOK violations; fill accounting is untouched.
    pub fn emit_cancel(&mut self, order: &OrderEvent, timestamp_ns: i64, queue: &mut EventQueue) {
        self.book.inactive(order.order_id);
        debug!(order_id = order.order_id, symbol = order.symbol, "order cancelled");

        queue.push(Event::Cancel(CancelEvent {
            symbol: order.symbol,
            order_id: order.order_id,
            timestamp_ns,
        }));
    }
}
