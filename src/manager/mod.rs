//! Multi-instrument routing facade.
//!
//! The manager owns one [`InstrumentPipeline`] per listed instrument and
//! routes every operation by symbol id. Instruments are independent
//! parallel pipelines; nothing coordinates across them and no cross-
//! instrument ordering is guaranteed.

pub mod instrument;
pub mod pipeline;

pub use instrument::Instrument;
pub use pipeline::InstrumentPipeline;

use crate::engine::EventCallback;
use crate::orderbook::{BookSnapshot, LevelSummary, OrderBookError};
use crate::types::{Order, OrderId, Price, SymbolId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Default capacity of the inbound and outbound queues of each instrument.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Owns all instruments and their pipelines.
///
/// The pipeline table is a sharded concurrent map, so routing does not
/// funnel through one global lock. Operations that act as an SPSC queue
/// endpoint (submitting orders, draining events) go through the map's
/// exclusive entry guard, which keeps the single-producer single-consumer
/// discipline intact even when several gateway threads call in.
pub struct InstrumentManager {
    pipelines: DashMap<SymbolId, InstrumentPipeline>,
    instruments: DashMap<SymbolId, Instrument>,
    next_symbol_id: AtomicU32,
    queue_capacity: usize,
    /// Applied to every current and future instrument.
    event_callback: Mutex<Option<EventCallback>>,
}

impl InstrumentManager {
    /// Creates a manager with the default per-instrument queue capacity.
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a manager whose instruments use queues of `queue_capacity`
    /// slots (rounded up to a power of two, one slot reserved).
    pub fn with_queue_capacity(queue_capacity: usize) -> Self {
        Self {
            pipelines: DashMap::new(),
            instruments: DashMap::new(),
            next_symbol_id: AtomicU32::new(1),
            queue_capacity,
            event_callback: Mutex::new(None),
        }
    }

    /// Lists a new instrument and starts its matching thread.
    ///
    /// # Errors
    /// Rejects an empty ticker and a non-positive initial price.
    pub fn add_instrument(
        &self,
        ticker: &str,
        description: &str,
        industry: &str,
        initial_price: f64,
    ) -> Result<SymbolId, OrderBookError> {
        if ticker.is_empty() {
            return Err(OrderBookError::InvalidTicker);
        }
        if initial_price <= 0.0 {
            return Err(OrderBookError::InvalidInitialPrice(initial_price));
        }

        let symbol_id = self.next_symbol_id.fetch_add(1, Ordering::Relaxed);
        let mut pipeline = InstrumentPipeline::new(ticker, self.queue_capacity);
        if let Some(callback) = self.current_callback() {
            pipeline.set_event_callback(callback);
        }
        pipeline.start();

        self.instruments.insert(
            symbol_id,
            Instrument::new(symbol_id, ticker, description, industry, initial_price),
        );
        self.pipelines.insert(symbol_id, pipeline);
        info!("instrument {} listed as {}", ticker, symbol_id);
        Ok(symbol_id)
    }

    /// Delists an instrument: stops its matching thread and destroys the
    /// book, resting orders and pending events. Returns `false` for an
    /// unknown id.
    pub fn remove_instrument(&self, symbol_id: SymbolId) -> bool {
        let Some((_, mut pipeline)) = self.pipelines.remove(&symbol_id) else {
            return false;
        };
        pipeline.stop();
        self.instruments.remove(&symbol_id);
        info!("instrument {} removed", symbol_id);
        true
    }

    /// Whether an instrument is listed under `symbol_id`.
    #[must_use]
    pub fn has_instrument(&self, symbol_id: SymbolId) -> bool {
        self.pipelines.contains_key(&symbol_id)
    }

    /// Metadata of one instrument.
    #[must_use]
    pub fn instrument(&self, symbol_id: SymbolId) -> Option<Instrument> {
        self.instruments
            .get(&symbol_id)
            .map(|entry| entry.value().clone())
    }

    /// Metadata of all instruments, ordered by symbol id.
    #[must_use]
    pub fn list_instruments(&self) -> Vec<Instrument> {
        let mut instruments: Vec<Instrument> = self
            .instruments
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        instruments.sort_by_key(|instrument| instrument.symbol_id);
        instruments
    }

    /// Routes an order to its instrument's inbound queue.
    ///
    /// Orders submitted from one thread for the same symbol are matched in
    /// submission order.
    ///
    /// # Errors
    /// `UnknownInstrument` when no such symbol is listed; `QueueFull` when
    /// the inbound queue has no room (backpressure, the caller may retry).
    pub fn submit_order(&self, order: Order) -> Result<(), OrderBookError> {
        match self.pipelines.get_mut(&order.symbol_id) {
            Some(mut pipeline) => pipeline.submit(order),
            None => Err(OrderBookError::UnknownInstrument(order.symbol_id)),
        }
    }

    /// Synchronously cancels a resting order, bypassing the inbound queue.
    ///
    /// Cancels must reflect trader intent immediately; enqueueing them
    /// would race the matching thread. The book mutex serializes this
    /// against the engine's match-plus-rest section. Returns `false` when
    /// the instrument or the order is unknown.
    pub fn cancel_order(&self, symbol_id: SymbolId, order_id: OrderId) -> bool {
        match self.pipelines.get(&symbol_id) {
            Some(pipeline) => pipeline.cancel(order_id),
            None => false,
        }
    }

    /// Best bid of an instrument; `None` when unknown or empty.
    #[must_use]
    pub fn best_bid(&self, symbol_id: SymbolId) -> Option<Price> {
        self.pipelines
            .get(&symbol_id)
            .and_then(|pipeline| pipeline.best_bid())
    }

    /// Best ask of an instrument; `None` when unknown or empty.
    #[must_use]
    pub fn best_ask(&self, symbol_id: SymbolId) -> Option<Price> {
        self.pipelines
            .get(&symbol_id)
            .and_then(|pipeline| pipeline.best_ask())
    }

    /// L2 bid levels of an instrument; empty when unknown. Depth 0 means
    /// all levels.
    #[must_use]
    pub fn snapshot_bids(&self, symbol_id: SymbolId, depth: usize) -> Vec<LevelSummary> {
        self.pipelines
            .get(&symbol_id)
            .map(|pipeline| pipeline.snapshot_bids(depth))
            .unwrap_or_default()
    }

    /// L2 ask levels of an instrument; empty when unknown. Depth 0 means
    /// all levels.
    #[must_use]
    pub fn snapshot_asks(&self, symbol_id: SymbolId, depth: usize) -> Vec<LevelSummary> {
        self.pipelines
            .get(&symbol_id)
            .map(|pipeline| pipeline.snapshot_asks(depth))
            .unwrap_or_default()
    }

    /// Both sides of an instrument's book; `None` when unknown.
    #[must_use]
    pub fn snapshot(&self, symbol_id: SymbolId, depth: usize) -> Option<BookSnapshot> {
        self.pipelines
            .get(&symbol_id)
            .and_then(|pipeline| pipeline.snapshot(depth))
    }

    /// Drains every instrument's outbound events into the installed
    /// callback on the calling thread. Returns the total drained.
    pub fn process_events(&self) -> usize {
        let mut drained = 0;
        for mut entry in self.pipelines.iter_mut() {
            drained += entry.value_mut().process_events();
        }
        drained
    }

    /// Installs the event callback on all current instruments and records
    /// it for instruments listed later.
    pub fn set_event_callback(&self, callback: EventCallback) {
        match self.event_callback.lock() {
            Ok(mut slot) => *slot = Some(Arc::clone(&callback)),
            Err(_) => {
                error!("event callback slot unavailable");
                return;
            }
        }
        for mut entry in self.pipelines.iter_mut() {
            entry.value_mut().set_event_callback(Arc::clone(&callback));
        }
    }

    /// Starts the matching threads of all instruments. Idempotent.
    pub fn start(&self) {
        for mut entry in self.pipelines.iter_mut() {
            entry.value_mut().start();
        }
    }

    /// Stops the matching threads of all instruments, discarding orders
    /// still queued. Idempotent.
    pub fn stop(&self) {
        for mut entry in self.pipelines.iter_mut() {
            entry.value_mut().stop();
        }
    }

    /// Whether any instrument's matching thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pipelines
            .iter()
            .any(|entry| entry.value().is_running())
    }

    fn current_callback(&self) -> Option<EventCallback> {
        self.event_callback
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
    }
}

impl Default for InstrumentManager {
    fn default() -> Self {
        Self::new()
    }
}
