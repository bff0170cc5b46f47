//! Core identifier types shared across the trading engine

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Dense symbol identifier in `[0, MAX_SYMBOLS)`.
///
/// All symbol-keyed state lives in fixed-capacity arrays indexed by this id,
/// so lookups on the hot path are plain array accesses rather than hash
/// lookups. Mapping exchange symbol strings to dense ids is the data-source
/// adapter's job.
pub type SymbolId = u32;

/// Order ID type - u64 for performance
pub type OrderId = u64;

/// Atomic counter for fast order ID generation
static ORDER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate next order ID (thread-safe, lock-free).
///
/// Relaxed ordering: ids are unique and monotonically increasing per issuing
/// thread, but concurrent callers get no cross-thread total order. Callers
/// that need a strict submission order must serialize externally.
pub fn next_order_id() -> OrderId {
    ORDER_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Current wall-clock time as epoch nanoseconds.
pub fn now_ns() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side implied by a signed quantity (buy > 0, sell < 0).
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity >= 0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}
