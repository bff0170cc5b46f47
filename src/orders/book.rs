//! Price/time-priority order book with O(1) id lookup
//!
//! Two ordered sides (bids and asks) backed by `BTreeMap`, plus a hash index
//! from order id to the record's sort key so point lookup and cancellation
//! never scan a side. Inactivated orders move into a bounded recency ledger.

use crate::events::OrderEvent;
use crate::orders::ledger::RecencyBuffer;
use crate::types::{OrderId, Side};
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, HashMap};

/// Default capacity of the historical order ledger.
pub const DEFAULT_LEDGER_CAPACITY: usize = 1024;

/// Order record with execution progress
#[derive(Debug, Clone)]
pub struct OrderState {
    /// Original order.
    pub order: OrderEvent,
    /// Cumulative filled quantity (magnitude).
    pub filled_quantity: i64,
    /// Weighted avg fill price.
    pub avg_fill_price: f64,
    /// Still working or fully closed.
    pub is_active: bool,
}

impl OrderState {
    pub fn new(order: OrderEvent) -> Self {
        Self {
            order,
            filled_quantity: 0,
            avg_fill_price: 0.0,
            is_active: true,
        }
    }

    /// Unfilled remainder of the order (magnitude).
    pub fn remaining_quantity(&self) -> i64 {
        (self.order.quantity.abs() - self.filled_quantity).max(0)
    }
}

/// Sort key: price first, submission time as tie-break.
///
/// Bid prices are stored negated so both sides sort ascending and the head
/// of each map is the best order. `seq` disambiguates records with equal
/// price and timestamp for map storage only; it never changes which of two
/// equivalent orders the book considers higher priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    price: OrderedFloat<f64>,
    timestamp_ns: i64,
    seq: u64,
}

/// Price/time-priority queue for working orders
#[derive(Debug)]
pub struct OrderBook {
    bids: BTreeMap<PriorityKey, OrderState>,
    asks: BTreeMap<PriorityKey, OrderState>,
    /// Back index: order id to the side and key holding it.
    index: HashMap<OrderId, (Side, PriorityKey)>,
    ledger: RecencyBuffer<OrderState>,
    next_seq: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::with_ledger_capacity(DEFAULT_LEDGER_CAPACITY)
    }

    /// Create a book whose historical ledger keeps `capacity` inactivated orders.
    pub fn with_ledger_capacity(capacity: usize) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            index: HashMap::new(),
            ledger: RecencyBuffer::new(capacity),
            next_seq: 0,
        }
    }

    /// Insert an order, routed by its buy/sell flag.
    ///
    /// If the id is already present the existing record is fully erased
    /// first; an id is never duplicated in the book.
    pub fn emplace(&mut self, order: OrderEvent) {
        if let Some((side, key)) = self.index.remove(&order.order_id) {
            self.side_mut(side).remove(&key);
        }

        let side = order.side();
        let key = PriorityKey {
            price: match side {
                Side::Buy => OrderedFloat(-order.price),
                Side::Sell => OrderedFloat(order.price),
            },
            timestamp_ns: order.timestamp_ns,
            seq: self.next_seq,
        };
        self.next_seq += 1;

        self.index.insert(order.order_id, (side, key));
        self.side_mut(side).insert(key, OrderState::new(order));
    }

    /// Look up an active order by id. Missing ids are routine, not errors.
    pub fn get(&self, id: OrderId) -> Option<&OrderState> {
        let (side, key) = self.index.get(&id)?;
        self.side(*side).get(key)
    }

    /// Mutable lookup. Only the fill-progress fields may change; the sort
    /// key (price, timestamp) is immutable for the record's lifetime, so
    /// mutation cannot disturb ordering.
    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut OrderState> {
        let (side, key) = *self.index.get(&id)?;
        self.side_mut(side).get_mut(&key)
    }

    /// Retire an order: move it into the historical ledger and erase it from
    /// the active side and index. No-op when the id is unknown.
    pub fn inactive(&mut self, id: OrderId) {
        if let Some((side, key)) = self.index.remove(&id) {
            if let Some(mut state) = self.side_mut(side).remove(&key) {
                state.is_active = false;
                self.ledger.push(state);
            }
        }
    }

    /// Highest-priced bid, earliest first on ties.
    pub fn best_bid(&self) -> Option<&OrderState> {
        self.bids.values().next()
    }

    /// Lowest-priced ask, earliest first on ties.
    pub fn best_ask(&self) -> Option<&OrderState> {
        self.asks.values().next()
    }

    /// Bids in priority order.
    pub fn bids(&self) -> impl Iterator<Item = &OrderState> {
        self.bids.values()
    }

    /// Asks in priority order.
    pub fn asks(&self) -> impl Iterator<Item = &OrderState> {
        self.asks.values()
    }

    /// Visit bids then asks in priority order, stopping a side's traversal
    /// once `f` returns false. Used by incremental matching passes where a
    /// breached price threshold makes the rest of the side irrelevant.
    pub fn for_each_pruned<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut OrderState) -> bool,
    {
        for state in self.bids.values_mut() {
            if !f(state) {
                break;
            }
        }
        for state in self.asks.values_mut() {
            if !f(state) {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Recency ledger of inactivated orders, oldest first.
    pub fn ledger(&self) -> &RecencyBuffer<OrderState> {
        &self.ledger
    }

    fn side(&self, side: Side) -> &BTreeMap<PriorityKey, OrderState> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<PriorityKey, OrderState> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
