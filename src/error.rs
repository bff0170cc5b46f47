//! Boundary error types
//!
//! These errors indicate caller or data-integrity bugs and propagate out of
//! the offending call immediately. Business outcomes (risk rejections,
//! pending quantity going negative, missing order-book ids) are never
//! errors: they are signaled through counters and `Option`/`bool` returns.

use crate::types::SymbolId;
use thiserror::Error;

/// Validation errors at the engine boundary
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EngineError {
    #[error("symbol id {id} out of range (capacity {capacity})")]
    SymbolOutOfRange { id: SymbolId, capacity: usize },

    #[error("price must be finite and positive, got {0}")]
    InvalidPrice(f64),

    #[error("quantity must be non-zero")]
    ZeroQuantity,
}
