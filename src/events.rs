//! Event types exchanged between engine components
//!
//! A closed sum type over the five event kinds, matched exhaustively at the
//! dispatch site, plus the FIFO queue the dispatcher drains and the
//! order-emission capability the portfolio manager writes into.

use crate::types::{OrderId, Side, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Market data tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub symbol: SymbolId,
    /// Trade price at the time of the tick.
    pub price: f64,
    /// Quantity of the base asset traded.
    pub quantity: f64,
    pub timestamp_ns: i64,
}

/// Trading signal emitted by a strategy
///
/// Quantity is signed: positive to buy, negative to sell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: SymbolId,
    pub quantity: i64,
    pub price: f64,
    pub timestamp_ns: i64,
}

/// Order submitted to the market
///
/// The originating fields (id, symbol, quantity, limit price, submission
/// timestamp) are fixed for the order's lifetime; fill progress lives in
/// [`crate::orders::OrderState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: OrderId,
    pub symbol: SymbolId,
    /// Signed quantity: positive for buys, negative for sells.
    pub quantity: i64,
    pub price: f64,
    pub timestamp_ns: i64,
}

impl OrderEvent {
    pub fn side(&self) -> Side {
        Side::from_quantity(self.quantity)
    }

    pub fn is_buy(&self) -> bool {
        self.quantity >= 0
    }
}

/// Filled order notification (execution result)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    pub symbol: SymbolId,
    pub order_id: OrderId,
    /// Magnitude of this fill; direction is carried by `side`.
    pub filled_quantity: i64,
    /// Total requested size of the originating order (magnitude).
    pub order_quantity: i64,
    pub side: Side,
    pub price: f64,
    pub timestamp_ns: i64,
}

impl FillEvent {
    /// The fill as a signed quantity, as the portfolio manager consumes it.
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * self.filled_quantity
    }
}

/// Cancelled order notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CancelEvent {
    pub symbol: SymbolId,
    pub order_id: OrderId,
    pub timestamp_ns: i64,
}

/// Unified event type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
    Cancel(CancelEvent),
}

/// FIFO queue for events awaiting dispatch
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Order-emission channel
///
/// Capability supplied by the caller of the portfolio manager: accept a
/// risk-approved order and do whatever is appropriate (submit to a venue,
/// push onto the shared event queue, record for inspection in tests).
pub trait OrderSink {
    fn submit(&mut self, order: OrderEvent);
}

impl OrderSink for EventQueue {
    fn submit(&mut self, order: OrderEvent) {
        self.push(Event::Order(order));
    }
}

/// Collects emitted orders; handy as a test double.
impl OrderSink for Vec<OrderEvent> {
    fn submit(&mut self, order: OrderEvent) {
        self.push(order);
    }
}
