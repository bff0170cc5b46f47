//! Order book, historical ledger, and execution-side fill tracking

pub mod book;
pub mod execution;
pub mod ledger;

pub use book::{OrderBook, OrderState, DEFAULT_LEDGER_CAPACITY};
pub use execution::{ExecutionHandler, FillTracker};
pub use ledger::RecencyBuffer;
