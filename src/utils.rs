//! Small time helpers shared across the crate.

use std::sync::OnceLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in milliseconds since the Unix epoch.
///
/// Used for informational timestamps (instrument creation, snapshots).
/// Not monotonic; never use it to order events.
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Returns a monotonic timestamp in nanoseconds.
///
/// The origin is the first call within the process, so values are only
/// comparable within one process lifetime. This is the timestamp stamped
/// on orders at ingress and carried on events and trades.
pub fn monotonic_nanos() -> u64 {
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_nanos_is_non_decreasing() {
        let a = monotonic_nanos();
        let b = monotonic_nanos();
        assert!(b >= a);
    }

    #[test]
    fn current_time_millis_is_plausible() {
        // Anything after 2020-01-01 counts as plausible.
        assert!(current_time_millis() > 1_577_836_800_000);
    }
}
