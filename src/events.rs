//! Engine output events.
//!
//! Events are a small closed sum, so they are modeled as a tagged enum
//! rather than a trait hierarchy; nothing on the hot path dispatches
//! virtually.

use crate::types::{OrderId, Timestamp, Trade};
use serde::{Deserialize, Serialize};

/// An event emitted by the matching pipeline for one instrument.
///
/// The engine itself produces only `Ack`, `Trade` and `Reject`; the cancel
/// variants complete the taxonomy for consumers that mirror the synchronous
/// cancel path into the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The order was received by the engine. Always precedes any of the
    /// order's trades in the outbound stream.
    Ack {
        /// The acknowledged order.
        order_id: OrderId,
        /// Monotonic nanoseconds.
        timestamp: Timestamp,
    },
    /// An execution involving this order as the taker.
    Trade {
        /// The taker order id (duplicated from the payload for uniform access).
        order_id: OrderId,
        /// The execution record.
        trade: Trade,
        /// Monotonic nanoseconds.
        timestamp: Timestamp,
    },
    /// A cancel request succeeded.
    CancelAck {
        /// The cancelled order.
        order_id: OrderId,
        /// Monotonic nanoseconds.
        timestamp: Timestamp,
    },
    /// A cancel request named an unknown order.
    CancelReject {
        /// The order id from the request.
        order_id: OrderId,
        /// Monotonic nanoseconds.
        timestamp: Timestamp,
    },
    /// The engine could not process the order at all. Defensive only; not
    /// produced in any normal flow.
    Reject {
        /// The rejected order.
        order_id: OrderId,
        /// Monotonic nanoseconds.
        timestamp: Timestamp,
    },
}

impl Event {
    /// Shorthand constructor for an `Ack`.
    pub fn ack(order_id: OrderId, timestamp: Timestamp) -> Self {
        Event::Ack {
            order_id,
            timestamp,
        }
    }

    /// Shorthand constructor for a `Trade` event; the taker id and timestamp
    /// come from the execution record.
    pub fn trade(trade: Trade) -> Self {
        Event::Trade {
            order_id: trade.taker_id,
            trade,
            timestamp: trade.timestamp,
        }
    }

    /// Shorthand constructor for a `Reject`.
    pub fn reject(order_id: OrderId, timestamp: Timestamp) -> Self {
        Event::Reject {
            order_id,
            timestamp,
        }
    }

    /// The order id this event refers to.
    #[must_use]
    pub fn order_id(&self) -> OrderId {
        match self {
            Event::Ack { order_id, .. }
            | Event::Trade { order_id, .. }
            | Event::CancelAck { order_id, .. }
            | Event::CancelReject { order_id, .. }
            | Event::Reject { order_id, .. } => *order_id,
        }
    }

    /// The event timestamp in monotonic nanoseconds.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Event::Ack { timestamp, .. }
            | Event::Trade { timestamp, .. }
            | Event::CancelAck { timestamp, .. }
            | Event::CancelReject { timestamp, .. }
            | Event::Reject { timestamp, .. } => *timestamp,
        }
    }

    /// Static name of the variant, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Ack { .. } => "Ack",
            Event::Trade { .. } => "Trade",
            Event::CancelAck { .. } => "CancelAck",
            Event::CancelReject { .. } => "CancelReject",
            Event::Reject { .. } => "Reject",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Trade;

    #[test]
    fn trade_event_inherits_taker_id_and_timestamp() {
        let trade = Trade {
            maker_id: 1,
            taker_id: 2,
            price: 100,
            quantity: 5,
            timestamp: 99,
        };
        let event = Event::trade(trade);
        assert_eq!(event.order_id(), 2);
        assert_eq!(event.timestamp(), 99);
        assert_eq!(event.kind(), "Trade");
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::ack(5, 0);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Ack");
        assert_eq!(json["order_id"], 5);
    }
}
