//! The per-instrument bundle: book, queues, engine, processor, output.

use crate::engine::{EventCallback, EventPublisher, MatchingEngine, OrderProcessor, OutputHandler};
use crate::orderbook::{BookSnapshot, LevelSummary, OrderBook, OrderBookError};
use crate::queue::SpscQueue;
use crate::types::{Order, OrderId, Price};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Everything one instrument needs, wired together and owned exclusively.
///
/// Two threads touch this bundle: the ingress side (submit, cancel,
/// snapshot, event draining) and the matching thread inside the processor.
/// The inbound and outbound SPSC queues each have exactly one producer and
/// one consumer; the methods that act as the ingress-side queue endpoint
/// (`submit`, `process_events`) take `&mut self` so the manager's routing
/// layer hands out that identity one caller at a time. Book state shared
/// with the matching thread is serialized by the book mutex.
pub struct InstrumentPipeline {
    book: Arc<Mutex<OrderBook>>,
    order_queue: Arc<SpscQueue<Order>>,
    processor: OrderProcessor,
    output: OutputHandler,
}

impl InstrumentPipeline {
    /// Wires up a pipeline for `symbol` with the given queue capacity
    /// (rounded up to a power of two). The processor is not started.
    pub fn new(symbol: &str, queue_capacity: usize) -> Self {
        let order_queue = Arc::new(SpscQueue::with_capacity(queue_capacity));
        let event_queue = Arc::new(SpscQueue::with_capacity(queue_capacity));
        let book = Arc::new(Mutex::new(OrderBook::new(symbol)));
        let engine = Arc::new(MatchingEngine::new(
            Arc::clone(&book),
            EventPublisher::new(Arc::clone(&event_queue)),
        ));
        let processor = OrderProcessor::new(
            Arc::clone(&order_queue),
            engine,
            format!("match-{symbol}"),
        );
        let output = OutputHandler::new(event_queue);
        Self {
            book,
            order_queue,
            processor,
            output,
        }
    }

    /// Enqueues an order for the matching thread. Fails with `QueueFull`
    /// when the inbound queue has no room; the order is handed back to the
    /// caller's backpressure policy untouched.
    pub fn submit(&mut self, order: Order) -> Result<(), OrderBookError> {
        self.order_queue
            .try_push(order)
            .map_err(|rejected| OrderBookError::QueueFull(rejected.symbol_id))
    }

    /// Synchronously cancels a resting order, serialized against the
    /// matching thread by the book mutex.
    pub fn cancel(&self, order_id: OrderId) -> bool {
        match self.book.lock() {
            Ok(mut book) => book.cancel_order(order_id),
            Err(_) => {
                error!("book unavailable, cancel of order {} failed", order_id);
                false
            }
        }
    }

    /// Best bid of the instrument's book.
    pub fn best_bid(&self) -> Option<Price> {
        self.book.lock().ok().and_then(|book| book.best_bid())
    }

    /// Best ask of the instrument's book.
    pub fn best_ask(&self) -> Option<Price> {
        self.book.lock().ok().and_then(|book| book.best_ask())
    }

    /// L2 bid levels, best first.
    pub fn snapshot_bids(&self, depth: usize) -> Vec<LevelSummary> {
        self.book
            .lock()
            .map(|book| book.snapshot_bids(depth))
            .unwrap_or_default()
    }

    /// L2 ask levels, best first.
    pub fn snapshot_asks(&self, depth: usize) -> Vec<LevelSummary> {
        self.book
            .lock()
            .map(|book| book.snapshot_asks(depth))
            .unwrap_or_default()
    }

    /// Both sides at once.
    pub fn snapshot(&self, depth: usize) -> Option<BookSnapshot> {
        self.book.lock().ok().map(|book| book.snapshot(depth))
    }

    /// Drains pending outbound events into the installed callback on the
    /// calling thread. Returns the number of events drained.
    pub fn process_events(&mut self) -> usize {
        self.output.process_events()
    }

    /// Installs the event callback for this instrument.
    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.output.set_callback(callback);
    }

    /// Starts the matching thread. Idempotent.
    pub fn start(&mut self) {
        self.processor.start();
    }

    /// Stops the matching thread, discarding undelivered inbound orders.
    /// Idempotent.
    pub fn stop(&mut self) {
        self.processor.stop();
    }

    /// Whether the matching thread is running.
    pub fn is_running(&self) -> bool {
        self.processor.is_running()
    }
}
