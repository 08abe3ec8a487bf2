//! Per-instrument limit order book with price-time priority.
//!
//! Each side is a price-ordered ladder of FIFO levels. A level keeps its
//! orders' ids in arrival order together with incrementally maintained
//! aggregates, while the orders themselves live in an id-keyed store that
//! doubles as the cancel index: an id is resting if and only if it is
//! present there. Cancelling removes the order from the store in O(1) and
//! leaves a tombstone id in the level's FIFO, which matching pops lazily;
//! time priority of the surviving orders is untouched.
//!
//! The book is not internally synchronized. Its owner serializes access
//! with one exclusive section per instrument, shared by the matching step,
//! cancels and snapshots.

use super::error::OrderBookError;
use super::snapshot::{BookSnapshot, LevelSummary};
use crate::types::{Order, OrderId, OrderType, Price, Quantity, Side};
use crate::utils::current_time_millis;
use crossbeam::atomic::AtomicCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, trace};

/// One price point on a ladder.
///
/// `queue` holds ids in arrival order and may contain ids of orders that
/// were already cancelled; those are skipped (and removed) the next time
/// matching reaches them. `total_quantity` and `live_orders` count only
/// live orders, so snapshots never see tombstones.
#[derive(Debug, Default)]
pub(super) struct PriceLevel {
    pub(super) queue: VecDeque<OrderId>,
    pub(super) total_quantity: Quantity,
    pub(super) live_orders: usize,
}

/// Resting limit orders of one instrument under price-time priority.
pub struct OrderBook {
    symbol: String,

    /// Bid ladder; best bid is the greatest key.
    pub(super) bids: BTreeMap<Price, PriceLevel>,

    /// Ask ladder; best ask is the smallest key.
    pub(super) asks: BTreeMap<Price, PriceLevel>,

    /// Live resting orders by id. Serves as the cancel index: every resting
    /// order is present here, and every entry points at a resting order.
    pub(super) orders: HashMap<OrderId, Order>,

    /// Price of the most recent execution, valid once `has_traded` is set.
    pub(super) last_trade_price: AtomicCell<Price>,
    pub(super) has_traded: AtomicBool,
}

impl OrderBook {
    /// Creates an empty book for `symbol`.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            last_trade_price: AtomicCell::new(0),
            has_traded: AtomicBool::new(false),
        }
    }

    /// The symbol this book belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Rests a limit order at the tail of its price level, creating the
    /// level if absent.
    ///
    /// # Errors
    /// Rejects non-limit orders and limit orders with non-positive price or
    /// quantity without touching the book. The engine screens these before
    /// calling; direct callers get the same guarantees.
    pub fn add_order(&mut self, order: Order) -> Result<(), OrderBookError> {
        if order.kind != OrderType::Limit {
            return Err(OrderBookError::InvalidOrderType { order_id: order.id });
        }
        if order.price <= 0 {
            return Err(OrderBookError::InvalidPrice {
                order_id: order.id,
                price: order.price,
            });
        }
        if order.quantity <= 0 {
            return Err(OrderBookError::InvalidQuantity {
                order_id: order.id,
                quantity: order.quantity,
            });
        }

        let ladder = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let level = ladder.entry(order.price).or_default();
        level.queue.push_back(order.id);
        level.total_quantity += order.quantity;
        level.live_orders += 1;
        trace!(
            "ADD {} id={} side={} price={} qty={}",
            self.symbol, order.id, order.side, order.price, order.quantity
        );
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Cancels a resting order by id. Returns `false` when the id is not
    /// resting; a repeated cancel of the same id is therefore silent.
    ///
    /// The order leaves the index immediately; its FIFO slot becomes a
    /// tombstone that matching discards when it reaches the front. A level
    /// whose last live order is cancelled is removed whole.
    pub fn cancel_order(&mut self, order_id: OrderId) -> bool {
        let Some(order) = self.orders.remove(&order_id) else {
            return false;
        };

        let ladder = match order.side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        match ladder.get_mut(&order.price) {
            Some(level) => {
                level.total_quantity -= order.quantity;
                level.live_orders -= 1;
                if level.live_orders == 0 {
                    ladder.remove(&order.price);
                }
            }
            None => {
                // The index pointed at a missing level; the book is
                // inconsistent. Surface loudly, nothing to repair here.
                error!(
                    "CANCEL {} id={}: level {} {} missing from ladder",
                    self.symbol, order_id, order.side, order.price
                );
            }
        }
        trace!("CANCEL {} id={}", self.symbol, order_id);
        true
    }

    /// Best (highest) bid price, if any bids rest.
    #[must_use]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.last_key_value().map(|(price, _)| *price)
    }

    /// Best (lowest) ask price, if any asks rest.
    #[must_use]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first_key_value().map(|(price, _)| *price)
    }

    /// Best price of the given ladder side.
    pub(crate) fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.best_bid(),
            Side::Sell => self.best_ask(),
        }
    }

    /// Whether `order_id` is currently resting.
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Remaining quantity of a resting order.
    #[must_use]
    pub fn resting_quantity(&self, order_id: OrderId) -> Option<Quantity> {
        self.orders.get(&order_id).map(|order| order.quantity)
    }

    /// Number of resting orders across both sides.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders rest on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Price of the most recent execution in this book, if any.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<Price> {
        if self.has_traded.load(Ordering::Relaxed) {
            Some(self.last_trade_price.load())
        } else {
            None
        }
    }

    /// Top `depth` bid levels in ladder order (descending price); depth 0
    /// means all levels.
    #[must_use]
    pub fn snapshot_bids(&self, depth: usize) -> Vec<LevelSummary> {
        Self::summarize(self.bids.iter().rev(), depth)
    }

    /// Top `depth` ask levels in ladder order (ascending price); depth 0
    /// means all levels.
    #[must_use]
    pub fn snapshot_asks(&self, depth: usize) -> Vec<LevelSummary> {
        Self::summarize(self.asks.iter(), depth)
    }

    /// Full L2 view of both sides at the given depth.
    #[must_use]
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            bids: self.snapshot_bids(depth),
            asks: self.snapshot_asks(depth),
        }
    }

    fn summarize<'a>(
        levels: impl Iterator<Item = (&'a Price, &'a PriceLevel)>,
        depth: usize,
    ) -> Vec<LevelSummary> {
        let take = if depth == 0 { usize::MAX } else { depth };
        levels
            .take(take)
            .map(|(price, level)| LevelSummary {
                price: *price,
                total_quantity: level.total_quantity,
                order_count: level.live_orders,
            })
            .collect()
    }
}
