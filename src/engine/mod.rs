//! Matching engine: consumes orders, drives the book, emits events.

pub mod processor;
pub mod publisher;

pub use processor::OrderProcessor;
pub use publisher::{EventCallback, EventPublisher, OutputHandler};

use crate::events::Event;
use crate::orderbook::OrderBook;
use crate::types::{market_sentinel, Order, OrderType};
use crate::utils::monotonic_nanos;
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

/// Executes one order at a time against an instrument's book.
///
/// The engine owns the sole producer identity for the outbound event queue
/// and shares the book with the ingress side (cancels, snapshots). Every
/// `process` call takes the book's mutex for the duration of one order's
/// match-plus-rest, which is the per-instrument exclusive section that
/// keeps concurrent cancels from tearing the book.
pub struct MatchingEngine {
    book: Arc<Mutex<OrderBook>>,
    publisher: EventPublisher,
}

impl MatchingEngine {
    /// Builds an engine over `book`, publishing through `publisher`.
    pub fn new(book: Arc<Mutex<OrderBook>>, publisher: EventPublisher) -> Self {
        Self { book, publisher }
    }

    /// Processes a single incoming order to completion.
    ///
    /// Stamps the ingress timestamp, acknowledges, matches under
    /// price-time priority, then rests any limit residual. Market residual
    /// is discarded without a further event. The `Ack` always precedes the
    /// order's `Trade`s in the outbound queue.
    pub fn process(&self, mut order: Order) {
        order.timestamp = monotonic_nanos();
        if order.kind == OrderType::Market {
            // Make the price predicate trivially true for market orders.
            order.price = market_sentinel(order.side);
        }

        let mut book = match self.book.lock() {
            Ok(book) => book,
            Err(_) => {
                // A poisoned book means a panic mid-mutation somewhere;
                // nothing sane can be matched against it. The order gets a
                // lone Reject in place of its Ack.
                error!("book unavailable, rejecting order {}", order.id);
                self.publisher
                    .publish(Event::reject(order.id, order.timestamp));
                return;
            }
        };

        self.publisher.publish(Event::ack(order.id, order.timestamp));

        let trades = book.match_order(&mut order);

        if order.kind == OrderType::Limit && order.quantity > 0 {
            if let Err(err) = book.add_order(order) {
                // The order was already acknowledged; a rest failure here
                // only loses the residual of a malformed order that the
                // gateway should have screened.
                warn!("residual of order {} not rested: {}", order.id, err);
            }
        }
        drop(book);

        for trade in trades {
            self.publisher.publish(Event::trade(trade));
        }
    }
}
