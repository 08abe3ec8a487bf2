//! Core order and trade types shared by every subsystem.
//!
//! Prices are expressed in integer ticks and quantities in integer lots; a
//! scaled integer representation avoids floating-point hazards in price
//! comparison. Both are signed so that market orders can carry a sentinel
//! price that makes the matching predicate trivially true.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique order identifier, issued monotonically by the ingress layer.
pub type OrderId = u64;

/// Identifier of an instrument, issued by the instrument manager starting at 1.
pub type SymbolId = u32;

/// Price in integer ticks.
pub type Price = i64;

/// Quantity in integer lots.
pub type Quantity = i64;

/// Monotonic timestamp in nanoseconds (see [`crate::utils::monotonic_nanos`]).
pub type Timestamp = u64;

/// Which side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bid side.
    Buy,
    /// Ask side.
    Sell,
}

impl Side {
    /// Returns the opposite side (the side an incoming order matches against).
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type: resting-capable limit or immediate-only market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Executes up to its limit price; any residual rests in the book.
    Limit,
    /// Executes against whatever liquidity is available; residual is discarded.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Sentinel price for a market order on the given side.
///
/// A buy at `Price::MAX` crosses every ask and a sell at `Price::MIN`
/// crosses every bid, so market orders need no special case in the price
/// predicate itself.
#[inline]
#[must_use]
pub fn market_sentinel(side: Side) -> Price {
    match side {
        Side::Buy => Price::MAX,
        Side::Sell => Price::MIN,
    }
}

/// A client order. `quantity` holds the remaining quantity and is mutated
/// in place while the order matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique id, issued by the ingress layer.
    pub id: OrderId,
    /// Instrument this order is routed to.
    pub symbol_id: SymbolId,
    /// Buy or sell.
    pub side: Side,
    /// Limit or market.
    pub kind: OrderType,
    /// Limit price in ticks; for market orders a sentinel, not consulted.
    pub price: Price,
    /// Remaining quantity in lots.
    pub quantity: Quantity,
    /// Monotonic nanoseconds at ingress. Time priority is implicit in queue
    /// position; this field exists for logging and diagnostics.
    pub timestamp: Timestamp,
}

impl Order {
    /// Creates a limit order.
    pub fn limit(
        id: OrderId,
        symbol_id: SymbolId,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            symbol_id,
            side,
            kind: OrderType::Limit,
            price,
            quantity,
            timestamp,
        }
    }

    /// Creates a market order. The price is set to the side's sentinel.
    pub fn market(
        id: OrderId,
        symbol_id: SymbolId,
        side: Side,
        quantity: Quantity,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            symbol_id,
            side,
            kind: OrderType::Market,
            price: market_sentinel(side),
            quantity,
            timestamp,
        }
    }
}

/// An immutable execution record. The price is always the maker (resting)
/// price; the quantity is the minimum of both remaining quantities at the
/// moment of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Id of the resting order.
    pub maker_id: OrderId,
    /// Id of the incoming order.
    pub taker_id: OrderId,
    /// Execution price in ticks.
    pub price: Price,
    /// Executed quantity in lots.
    pub quantity: Quantity,
    /// Monotonic nanoseconds, inherited from the taker's ingress timestamp.
    pub timestamp: Timestamp,
}
