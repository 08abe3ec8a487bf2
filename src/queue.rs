//! Bounded single-producer single-consumer ring buffer.
//!
//! This is the only channel between the ingress side and a matching thread:
//! orders flow in through one queue, events flow out through another. Both
//! operations are wait-free when the queue is neither full nor empty; the
//! only failure mode is capacity exhaustion, surfaced to the caller.
//!
//! The producer's write of a slot happens-before the consumer's read of the
//! same slot: the producer publishes with a release store of its index and
//! the consumer observes it with an acquire load (symmetrically for the
//! consumer's index when the producer checks for full). Reads of one's own
//! index are relaxed. Both indices are cache-line padded so the two threads
//! never false-share.
//!
//! Exactly one thread may push and exactly one thread may pop for the
//! lifetime of the queue. This is an ownership contract at the API boundary,
//! not a runtime check: the per-instrument pipeline hands each end to a
//! single thread and never duplicates it. Violating the discipline is a
//! programming error.

use crossbeam::utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Bounded SPSC FIFO with power-of-two capacity.
///
/// One slot is reserved to distinguish full from empty, so a queue built
/// with `with_capacity(n)` holds up to `n.next_power_of_two() - 1` items
/// (minimum 1).
pub struct SpscQueue<T> {
    /// Producer index: next slot to write. Stored already masked.
    head: CachePadded<AtomicUsize>,
    /// Consumer index: next slot to read. Stored already masked.
    tail: CachePadded<AtomicUsize>,
    mask: usize,
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// The queue moves T values across exactly one producer/consumer pair; the
// slots themselves are only touched by the side that owns the index.
unsafe impl<T: Send> Send for SpscQueue<T> {}
unsafe impl<T: Send> Sync for SpscQueue<T> {}

impl<T> SpscQueue<T> {
    /// Creates a queue able to hold `capacity - 1` items after rounding
    /// `capacity` up to a power of two no smaller than 2.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = capacity.max(2).next_power_of_two();
        let buffer = (0..cap)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            mask: cap - 1,
            buffer,
        }
    }

    /// Attempts to publish `value`. Returns it back untouched when the
    /// queue is full. Wait-free; producer side only.
    pub fn try_push(&self, value: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) & self.mask;
        if next == self.tail.load(Ordering::Acquire) {
            return Err(value);
        }
        // Safety: `head` is owned by the unique producer and the slot at
        // `head` is unoccupied (checked against the consumer index above).
        unsafe {
            (*self.buffer[head].get()).write(value);
        }
        self.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Attempts to take the oldest value. Returns `None` when the queue is
    /// empty. Wait-free; consumer side only.
    pub fn try_pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        // Safety: `tail` is owned by the unique consumer and the slot at
        // `tail` was fully written before the producer's release store made
        // it visible.
        let value = unsafe { (*self.buffer[tail].get()).assume_init_read() };
        self.tail.store((tail + 1) & self.mask, Ordering::Release);
        Some(value)
    }

    /// Whether the queue currently holds no items.
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Whether a `try_push` would currently fail.
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        (head + 1) & self.mask == self.tail.load(Ordering::Acquire)
    }

    /// Number of items currently queued.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head.wrapping_sub(tail)) & self.mask
    }

    /// Usable capacity (one slot less than the allocated power of two).
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.mask
    }
}

impl<T> Drop for SpscQueue<T> {
    fn drop(&mut self) {
        // Release any items still in flight.
        while self.try_pop().is_some() {}
    }
}
