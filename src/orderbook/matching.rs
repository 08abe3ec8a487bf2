//! Price-time priority matching, implemented directly on the book.
//!
//! Matching lives as methods on [`OrderBook`] so the engine never needs a
//! privileged back door into ladder internals: the whole match-and-rest
//! sequence runs inside the owner's per-instrument exclusive section.

use super::book::{OrderBook, PriceLevel};
use crate::types::{Order, OrderId, OrderType, Price, Side, Trade};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use tracing::trace;

impl OrderBook {
    /// Whether a taker at `taker_price` crosses a maker at `maker_price`.
    ///
    /// Market orders always cross; limit buys cross at or below their
    /// price, limit sells at or above.
    pub(crate) fn can_match(
        taker_side: Side,
        taker_price: Price,
        maker_price: Price,
        kind: OrderType,
    ) -> bool {
        if kind == OrderType::Market {
            return true;
        }
        match taker_side {
            Side::Buy => taker_price >= maker_price,
            Side::Sell => taker_price <= maker_price,
        }
    }

    /// Executes `taker` against the contra ladder under price-time
    /// priority, decrementing `taker.quantity` in place and returning the
    /// executions in the order they occurred.
    ///
    /// Walks contra levels best-first; within a level, makers fill in
    /// arrival order. Fully filled makers leave the book and the cancel
    /// index; a drained level leaves its ladder. The taker is never rested
    /// here; the caller decides what to do with any residual.
    pub fn match_order(&mut self, taker: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();
        let contra = taker.side.opposite();

        while taker.quantity > 0 {
            let Some(maker_price) = self.best_price(contra) else {
                break;
            };
            if !Self::can_match(taker.side, taker.price, maker_price, taker.kind) {
                break;
            }
            self.match_at_level(contra, maker_price, taker, &mut trades);
        }

        if let Some(last) = trades.last() {
            self.last_trade_price.store(last.price);
            self.has_traded.store(true, Ordering::Relaxed);
        }
        trades
    }

    /// Drains the FIFO at `maker_price` into `taker` until one of them is
    /// exhausted. Removes the level when its last live order goes.
    fn match_at_level(
        &mut self,
        contra: Side,
        maker_price: Price,
        taker: &mut Order,
        trades: &mut Vec<Trade>,
    ) {
        let (ladder, orders) = match contra {
            Side::Buy => (&mut self.bids, &mut self.orders),
            Side::Sell => (&mut self.asks, &mut self.orders),
        };
        let Some(level) = ladder.get_mut(&maker_price) else {
            return;
        };

        while taker.quantity > 0 {
            let Some(&front_id) = level.queue.front() else {
                break;
            };
            let Some(maker) = orders.get_mut(&front_id) else {
                // Tombstone of a cancelled order; drop it and look again.
                level.queue.pop_front();
                continue;
            };

            let quantity = taker.quantity.min(maker.quantity);
            maker.quantity -= quantity;
            taker.quantity -= quantity;
            level.total_quantity -= quantity;
            trades.push(Trade {
                maker_id: front_id,
                taker_id: taker.id,
                price: maker_price,
                quantity,
                timestamp: taker.timestamp,
            });
            trace!(
                "TRADE maker={} taker={} px={} qty={}",
                front_id, taker.id, maker_price, quantity
            );

            if maker.quantity == 0 {
                erase_front(level, orders, front_id);
            }
        }

        if level.live_orders == 0 {
            ladder.remove(&maker_price);
        }
    }
}

/// Pops the front of a level and evicts it from the cancel index, but only
/// if the front still carries `expected_id`. The guard keeps a restructured
/// level from losing the wrong order.
fn erase_front(
    level: &mut PriceLevel,
    orders: &mut HashMap<OrderId, Order>,
    expected_id: OrderId,
) {
    if level.queue.front() == Some(&expected_id) {
        level.queue.pop_front();
        orders.remove(&expected_id);
        level.live_orders -= 1;
    }
}
