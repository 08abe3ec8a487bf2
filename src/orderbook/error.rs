//! Error types for the matching core.

use crate::types::{OrderId, Price, Quantity, SymbolId};
use std::fmt;

/// Failures surfaced by the order book and the instrument manager.
///
/// Validation and not-found failures are recovered locally by the caller;
/// `QueueFull` is backpressure the submitter may retry. None of these are
/// internal invariant violations, which are logged and treated as bugs.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Limit order with a non-positive price.
    InvalidPrice {
        /// The offending order.
        order_id: OrderId,
        /// The rejected price.
        price: Price,
    },

    /// Order with a non-positive quantity.
    InvalidQuantity {
        /// The offending order.
        order_id: OrderId,
        /// The rejected quantity.
        quantity: Quantity,
    },

    /// Attempt to rest an order that is not a limit order.
    InvalidOrderType {
        /// The offending order.
        order_id: OrderId,
    },

    /// No instrument registered under this id.
    UnknownInstrument(SymbolId),

    /// The instrument's inbound queue is full; the order was not enqueued.
    QueueFull(SymbolId),

    /// Cancel or lookup named an order that is not resting.
    OrderNotFound(OrderId),

    /// Instrument registration with an empty ticker.
    InvalidTicker,

    /// Instrument registration with a non-positive initial price.
    InvalidInitialPrice(f64),
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidPrice { order_id, price } => {
                write!(f, "invalid price {price} for limit order {order_id}")
            }
            OrderBookError::InvalidQuantity { order_id, quantity } => {
                write!(f, "invalid quantity {quantity} for order {order_id}")
            }
            OrderBookError::InvalidOrderType { order_id } => {
                write!(f, "order {order_id} is not a limit order and cannot rest")
            }
            OrderBookError::UnknownInstrument(symbol_id) => {
                write!(f, "unknown instrument {symbol_id}")
            }
            OrderBookError::QueueFull(symbol_id) => {
                write!(f, "inbound queue full for instrument {symbol_id}")
            }
            OrderBookError::OrderNotFound(order_id) => {
                write!(f, "order not found: {order_id}")
            }
            OrderBookError::InvalidTicker => {
                write!(f, "ticker must not be empty")
            }
            OrderBookError::InvalidInitialPrice(price) => {
                write!(f, "initial price must be positive, got {price}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
