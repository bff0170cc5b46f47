//! Integration tests for the trading core
//!
//! Exercises the full event path: ticks drive a strategy, signals pass the
//! portfolio risk gate, orders are executed with partial fills and IOC
//! cancels, and fills flow back into position and cash state.

use approx::assert_relative_eq;
use trading_core::{
    Engine, EngineConfig, Event, EventQueue, ExecutionHandler, FillTracker, MarketEvent,
    MarketStream, OrderEvent, PortfolioManager, RiskLimits, SignalEvent, Strategy,
};

const MAX_SYMBOLS: usize = 32;

/// Route engine logs through the test harness; RUST_LOG selects the level.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct ScriptedStream {
    ticks: std::vec::IntoIter<MarketEvent>,
}

impl ScriptedStream {
    fn new(ticks: Vec<MarketEvent>) -> Self {
        Self {
            ticks: ticks.into_iter(),
        }
    }
}

impl MarketStream for ScriptedStream {
    fn next_tick(&mut self) -> Option<MarketEvent> {
        self.ticks.next()
    }
}

/// Emits one signal per scripted entry when its tick index comes up.
struct ScriptedStrategy {
    signals: Vec<(usize, SignalEvent)>,
    ticks_seen: usize,
}

impl Strategy for ScriptedStrategy {
    fn on_market(&mut self, _event: &MarketEvent, queue: &mut EventQueue) {
        for (at_tick, signal) in &self.signals {
            if *at_tick == self.ticks_seen {
                queue.push(Event::Signal(*signal));
            }
        }
        self.ticks_seen += 1;
    }
}

/// Simulated venue: fills in fixed-size slices, cancels orders flagged IOC
/// once the first slice is done.
struct SlicingVenue {
    tracker: FillTracker,
    slice: i64,
    ioc: bool,
}

impl ExecutionHandler for SlicingVenue {
    fn on_order(&mut self, order: &OrderEvent, queue: &mut EventQueue) {
        let total = order.quantity.abs();
        let first = self.slice.min(total);
        self.tracker
            .apply_fill(order, first, order.price, order.timestamp_ns, queue);

        if self.ioc && first < total {
            self.tracker.emit_cancel(order, order.timestamp_ns, queue);
        } else {
            let mut remaining = total - first;
            while remaining > 0 {
                let next = self.slice.min(remaining);
                self.tracker
                    .apply_fill(order, next, order.price, order.timestamp_ns, queue);
                remaining -= next;
            }
        }
    }
}

fn tick(symbol: u32, price: f64, timestamp_ns: i64) -> MarketEvent {
    MarketEvent {
        symbol,
        price,
        quantity: 1.0,
        timestamp_ns,
    }
}

fn signal(symbol: u32, quantity: i64, price: f64, timestamp_ns: i64) -> SignalEvent {
    SignalEvent {
        symbol,
        quantity,
        price,
        timestamp_ns,
    }
}

#[test]
fn test_round_trip_with_partial_fills() {
    init_logging();
    let stream = ScriptedStream::new(vec![
        tick(0, 50.0, 1),
        tick(0, 55.0, 2),
        tick(0, 55.0, 3),
    ]);
    let strategy = ScriptedStrategy {
        // Buy 100 @ 50, then reverse: sell 150 @ 55.
        signals: vec![(0, signal(0, 100, 50.0, 1)), (1, signal(0, -150, 55.0, 2))],
        ticks_seen: 0,
    };
    let mut portfolio: PortfolioManager<MAX_SYMBOLS> = PortfolioManager::new(100_000.0);
    portfolio
        .set_risk_limit(
            0,
            RiskLimits {
                max_position: 500,
                max_order_size: 200,
                max_notional: 1e9,
            },
        )
        .unwrap();

    let mut engine = Engine::new(
        stream,
        strategy,
        portfolio,
        SlicingVenue {
            tracker: FillTracker::new(),
            slice: 40,
            ioc: false,
        },
    );
    engine.run().unwrap();

    let pm = engine.portfolio();
    let pos = pm.position(0).unwrap();
    assert_eq!(pos.quantity, -50);
    assert_eq!(pos.pending_quantity, 0);
    assert_relative_eq!(pos.average_cost, 55.0, max_relative = 1e-9);
    assert_relative_eq!(pm.realized_pnl(), 500.0, max_relative = 1e-9); // 100*(55-50)
    assert_eq!(pm.orders_submitted(), 2);
    // 100 in slices of 40 = 3 fills, 150 in slices of 40 = 4 fills.
    assert_eq!(pm.total_trades(), 7);

    // Both orders completed and were retired to the historical ledger.
    let book = engine.execution().tracker.book();
    assert!(book.is_empty());
    assert_eq!(book.ledger().len(), 2);
    let avg_prices: Vec<f64> = book.ledger().iter().map(|s| s.avg_fill_price).collect();
    assert_relative_eq!(avg_prices[0], 50.0, max_relative = 1e-9);
    assert_relative_eq!(avg_prices[1], 55.0, max_relative = 1e-9);

    let metrics = pm.compute_metrics();
    assert_eq!(metrics.num_positions, 1);
    assert_relative_eq!(metrics.net_exposure, -50.0 * 55.0, max_relative = 1e-9);
    assert_relative_eq!(metrics.gross_exposure, 50.0 * 55.0, max_relative = 1e-9);
}

#[test]
fn test_ioc_cancel_leaves_pending_reservation() {
    init_logging();
    let stream = ScriptedStream::new(vec![tick(1, 20.0, 1)]);
    let strategy = ScriptedStrategy {
        signals: vec![(0, signal(1, 100, 20.0, 1))],
        ticks_seen: 0,
    };
    let mut engine: Engine<_, _, _, MAX_SYMBOLS> = Engine::new(
        stream,
        strategy,
        PortfolioManager::new(100_000.0),
        SlicingVenue {
            tracker: FillTracker::new(),
            slice: 30,
            ioc: true,
        },
    );
    engine.run().unwrap();

    let pm = engine.portfolio();
    let pos = pm.position(1).unwrap();
    // Only the first 30 of 100 filled before the IOC cancel.
    assert_eq!(pos.quantity, 30);
    assert_eq!(pos.pending_quantity, 70); // unfilled reservation remains
    assert_eq!(pm.cancel_count(), 1);
    assert_eq!(pm.cancelled_order_ids().len(), 1);

    // The cancelled order sits in the ledger with its partial progress.
    let book = engine.execution().tracker.book();
    assert!(book.is_empty());
    let retired = book.ledger().latest().unwrap();
    assert_eq!(retired.filled_quantity, 30);
    assert!(!retired.is_active);
}

#[test]
fn test_multi_symbol_metrics_and_equity() {
    init_logging();
    let stream = ScriptedStream::new(vec![
        tick(0, 100.0, 1),
        tick(1, 50.0, 2),
        tick(0, 110.0, 3),
        tick(1, 45.0, 4),
    ]);
    let strategy = ScriptedStrategy {
        signals: vec![(0, signal(0, 10, 100.0, 1)), (1, signal(1, -20, 50.0, 2))],
        ticks_seen: 0,
    };
    let config = EngineConfig::default().with_starting_cash(10_000.0);
    let mut engine: Engine<_, _, _, MAX_SYMBOLS> = Engine::new(
        stream,
        strategy,
        PortfolioManager::with_config(&config),
        SlicingVenue {
            tracker: FillTracker::new(),
            slice: 1_000,
            ioc: false,
        },
    );
    engine.run().unwrap();

    let pm = engine.portfolio();
    let metrics = pm.compute_metrics();
    assert_eq!(metrics.num_positions, 2);
    // long 10 @ 100 marked 110: +100; short 20 @ 50 marked 45: +100
    assert_relative_eq!(metrics.unrealized_pnl, 200.0, max_relative = 1e-9);
    assert_relative_eq!(metrics.realized_pnl, 0.0, max_relative = 1e-9);
    assert_relative_eq!(metrics.total_pnl, 200.0, max_relative = 1e-9);
    assert_relative_eq!(
        metrics.gross_exposure,
        10.0 * 110.0 + 20.0 * 45.0,
        max_relative = 1e-9
    );

    // cash = 10000 - 1000 + 1000 = 10000; equity adds marked notionals
    assert_relative_eq!(pm.cash_balance(), 10_000.0, max_relative = 1e-9);
    assert_relative_eq!(
        pm.total_equity(),
        10_000.0 + 10.0 * 110.0 - 20.0 * 45.0,
        max_relative = 1e-9
    );
}

#[test]
fn test_rejected_signals_are_counted_not_fatal() {
    init_logging();
    let stream = ScriptedStream::new(vec![tick(0, 50.0, 1), tick(0, 50.0, 2)]);
    let strategy = ScriptedStrategy {
        signals: vec![
            (0, signal(0, 50, 50.0, 1)),  // accepted: within default limits
            (1, signal(0, 5_000, 50.0, 2)), // rejected: breaches max_order_size
        ],
        ticks_seen: 0,
    };
    let mut engine: Engine<_, _, _, MAX_SYMBOLS> = Engine::new(
        stream,
        strategy,
        PortfolioManager::new(1_000_000.0),
        SlicingVenue {
            tracker: FillTracker::new(),
            slice: 1_000,
            ioc: false,
        },
    );
    engine.run().unwrap();

    let pm = engine.portfolio();
    assert_eq!(pm.orders_submitted(), 1);
    assert_eq!(pm.orders_rejected(), 1);
    assert_eq!(pm.position(0).unwrap().quantity, 50);
}
