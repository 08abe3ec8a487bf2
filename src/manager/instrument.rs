//! Instrument metadata.

use crate::types::SymbolId;
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};

/// Descriptive metadata of a tradable instrument.
///
/// Purely informational: nothing here influences matching. The initial
/// price seeds downstream consumers (dashboards, agents) and is kept as a
/// float because it never enters a price comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Manager-issued id, starting at 1.
    pub symbol_id: SymbolId,
    /// Short trading symbol, e.g. "AAPL". Never empty.
    pub ticker: String,
    /// Free-form description.
    pub description: String,
    /// Industry classification.
    pub industry: String,
    /// Reference price at listing time. Always positive.
    pub initial_price: f64,
    /// Wall-clock milliseconds when the instrument was registered.
    pub created_at: u64,
}

impl Instrument {
    /// Creates metadata stamped with the current wall-clock time.
    pub fn new(
        symbol_id: SymbolId,
        ticker: &str,
        description: &str,
        industry: &str,
        initial_price: f64,
    ) -> Self {
        Self {
            symbol_id,
            ticker: ticker.to_string(),
            description: description.to_string(),
            industry: industry.to_string(),
            initial_price,
            created_at: current_time_millis(),
        }
    }
}
