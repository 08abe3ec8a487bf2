//! # matchbook-rs
//!
//! A single-process, multi-instrument limit-order matching engine with
//! price-time priority, bounded lock-free SPSC queues between network
//! ingress and matching, and an event stream out.
//!
//! ## Architecture
//!
//! Each instrument is an independent pipeline:
//!
//! - an inbound [`queue::SpscQueue`] carrying [`types::Order`]s from the
//!   ingress thread to the matching thread;
//! - an [`orderbook::OrderBook`] holding resting limit orders in two
//!   price ladders with a constant-time cancel index;
//! - an [`engine::MatchingEngine`] executing one order at a time under
//!   price-time priority, emitting [`events::Event`]s;
//! - an [`engine::OrderProcessor`] owning the matching thread;
//! - an outbound SPSC queue drained on the ingress side through
//!   [`engine::OutputHandler`] into a user callback.
//!
//! The [`manager::InstrumentManager`] owns all pipelines and routes by
//! symbol id; [`server::TcpServer`] exposes the line-oriented TCP protocol
//! on top of it. Instruments never coordinate with each other.
//!
//! ## Concurrency model
//!
//! Exactly two threads touch an instrument's state: the ingress thread
//! (unique producer of the inbound queue, unique consumer of the outbound
//! queue) and the matching thread (the reverse). The SPSC queues
//! synchronize delivery; concurrent mutation of the book itself (matching
//! vs. synchronous cancel vs. snapshot) is serialized by one narrow
//! exclusive section per instrument. There is no async runtime: the
//! matching loop polls its queue and yields when empty, which keeps the
//! single-producer single-consumer invariants enforceable at the ownership
//! boundary.
//!
//! ## Guarantees
//!
//! - Price-time priority: best price first, earliest arrival first within
//!   a price level; cancels do not reorder survivors.
//! - No crossed book at rest: an incoming order that would cross is
//!   matched before any residual rests.
//! - Per-instrument FIFO: orders submitted from one thread for one symbol
//!   match in submission order, and an order's `Ack` precedes all of its
//!   `Trade` events.
//! - Bounded memory: queue capacities are fixed; a full inbound queue is
//!   backpressure to the submitter, a full outbound queue drops events.

pub mod engine;
pub mod events;
pub mod manager;
pub mod orderbook;
pub mod prelude;
pub mod queue;
pub mod server;
pub mod types;
pub mod utils;

pub use engine::{EventCallback, EventPublisher, MatchingEngine, OrderProcessor, OutputHandler};
pub use events::Event;
pub use manager::{Instrument, InstrumentManager, InstrumentPipeline, DEFAULT_QUEUE_CAPACITY};
pub use orderbook::{BookSnapshot, LevelSummary, OrderBook, OrderBookError};
pub use queue::SpscQueue;
pub use server::TcpServer;
pub use types::{
    market_sentinel, Order, OrderId, OrderType, Price, Quantity, Side, SymbolId, Timestamp, Trade,
};
