//! L2 market data snapshots.

use crate::types::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Aggregate view of one price level: total live quantity and order count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    /// The level's price in ticks.
    pub price: Price,
    /// Sum of remaining quantities of all live orders at this price.
    pub total_quantity: Quantity,
    /// Number of live orders at this price.
    pub order_count: usize,
}

/// A point-in-time L2 view of one book, bids descending and asks ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// The symbol this snapshot belongs to.
    pub symbol: String,
    /// Wall-clock milliseconds when the snapshot was taken.
    pub timestamp: u64,
    /// Bid levels, best first.
    pub bids: Vec<LevelSummary>,
    /// Ask levels, best first.
    pub asks: Vec<LevelSummary>,
}

impl BookSnapshot {
    /// Best bid price and quantity in the snapshot.
    #[must_use]
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids
            .first()
            .map(|level| (level.price, level.total_quantity))
    }

    /// Best ask price and quantity in the snapshot.
    #[must_use]
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks
            .first()
            .map(|level| (level.price, level.total_quantity))
    }

    /// Mid price (average of best bid and best ask), when both sides exist.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Spread (best ask minus best bid), when both sides exist.
    #[must_use]
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask - bid),
            _ => None,
        }
    }
}
