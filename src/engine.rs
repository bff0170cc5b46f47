//! Generic event-dispatch engine
//!
//! Polls a market-data stream, routes each event to the right component,
//! then drains the follow-on events the components pushed onto the queue.
//! Strategy and execution are capabilities supplied by the caller; the
//! engine owns the portfolio manager and the queue.
//!
//! Single-threaded by design: every operation runs to completion on the
//! caller's thread, and all mutation is pinned to the thread running `run`.

use crate::error::EngineError;
use crate::events::{Event, EventQueue, MarketEvent, SignalEvent};
use crate::orders::ExecutionHandler;
use crate::portfolio::PortfolioManager;
use tracing::info;

/// Market data source
pub trait MarketStream {
    /// Next tick, or `None` when the stream is exhausted.
    fn next_tick(&mut self) -> Option<MarketEvent>;
}

/// Trading strategy capability
pub trait Strategy {
    /// React to a market tick, typically by pushing signal events.
    fn on_market(&mut self, event: &MarketEvent, queue: &mut EventQueue);

    /// Optional hook for strategies that post-process their own signals.
    fn on_signal(&mut self, event: &SignalEvent, queue: &mut EventQueue) {
        let _ = (event, queue);
    }
}

/// Event loop tying a stream, strategy, portfolio, and execution handler together
pub struct Engine<M, S, E, const MAX_SYMBOLS: usize>
where
    M: MarketStream,
    S: Strategy,
    E: ExecutionHandler,
{
    stream: M,
    strategy: S,
    portfolio: PortfolioManager<MAX_SYMBOLS>,
    exec: E,
    queue: EventQueue,
}

impl<M, S, E, const MAX_SYMBOLS: usize> Engine<M, S, E, MAX_SYMBOLS>
where
    M: MarketStream,
    S: Strategy,
    E: ExecutionHandler,
{
    pub fn new(stream: M, strategy: S, portfolio: PortfolioManager<MAX_SYMBOLS>, exec: E) -> Self {
        Self {
            stream,
            strategy,
            portfolio,
            exec,
            queue: EventQueue::new(),
        }
    }

    pub fn portfolio(&self) -> &PortfolioManager<MAX_SYMBOLS> {
        &self.portfolio
    }

    pub fn portfolio_mut(&mut self) -> &mut PortfolioManager<MAX_SYMBOLS> {
        &mut self.portfolio
    }

    pub fn execution(&self) -> &E {
        &self.exec
    }

    /// Run until the market stream is exhausted, draining the queue after
    /// every tick. Boundary errors from the portfolio abort the loop; they
    /// indicate integration bugs, not recoverable business outcomes.
    pub fn run(&mut self) -> Result<(), EngineError> {
        info!("engine loop started");
        while let Some(tick) = self.stream.next_tick() {
            self.dispatch(Event::Market(tick))?;
            while let Some(event) = self.queue.pop() {
                self.dispatch(event)?;
            }
        }
        info!(
            trades = self.portfolio.total_trades(),
            rejected = self.portfolio.orders_rejected(),
            "engine loop finished"
        );
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<(), EngineError> {
        match event {
            Event::Market(ev) => {
                self.strategy.on_market(&ev, &mut self.queue);
                self.exec.on_market(&ev, &mut self.queue);
                self.portfolio.on_market_data(ev.symbol, ev.price)?;
            }
            Event::Signal(ev) => {
                self.strategy.on_signal(&ev, &mut self.queue);
                self.portfolio
                    .on_signal(ev.symbol, ev.quantity, ev.price, ev.timestamp_ns, &mut self.queue)?;
            }
            Event::Order(ev) => {
                self.exec.on_order(&ev, &mut self.queue);
            }
            Event::Fill(ev) => {
                self.portfolio
                    .on_fill(ev.symbol, ev.signed_quantity(), ev.price)?;
            }
            Event::Cancel(ev) => {
                self.portfolio.on_cancel(&ev);
            }
        }
        Ok(())
    }
}
