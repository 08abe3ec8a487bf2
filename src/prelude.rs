//! Prelude module that re-exports the commonly used types.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook_rs::prelude::*;
//! ```

// Core types
pub use crate::types::{
    market_sentinel, Order, OrderId, OrderType, Price, Quantity, Side, SymbolId, Timestamp, Trade,
};

// Events
pub use crate::events::Event;

// Order book
pub use crate::orderbook::{BookSnapshot, LevelSummary, OrderBook, OrderBookError};

// Pipeline components
pub use crate::engine::{
    EventCallback, EventPublisher, MatchingEngine, OrderProcessor, OutputHandler,
};
pub use crate::queue::SpscQueue;

// Instrument management
pub use crate::manager::{Instrument, InstrumentManager, DEFAULT_QUEUE_CAPACITY};

// Wire layer
pub use crate::server::{TcpServer, SNAPSHOT_DEPTH};

// Utility functions
pub use crate::utils::{current_time_millis, monotonic_nanos};
