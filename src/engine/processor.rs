//! Dedicated per-instrument thread that drains the inbound order queue.

use super::MatchingEngine;
use crate::queue::SpscQueue;
use crate::types::Order;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Owns the matching thread of one instrument.
///
/// The processor is the unique consumer of the inbound queue. Its loop pops
/// one order at a time into [`MatchingEngine::process`] and yields the CPU
/// when the queue is empty; latency is dominated by the matching step, not
/// the hand-off. `start` and `stop` are idempotent, and dropping the
/// processor stops it.
pub struct OrderProcessor {
    queue: Arc<SpscQueue<Order>>,
    engine: Arc<MatchingEngine>,
    running: Arc<AtomicBool>,
    thread_name: String,
    handle: Option<JoinHandle<()>>,
}

impl OrderProcessor {
    /// Builds a processor over the inbound `queue`, not yet running.
    /// `thread_name` names the spawned OS thread for diagnostics.
    pub fn new(
        queue: Arc<SpscQueue<Order>>,
        engine: Arc<MatchingEngine>,
        thread_name: String,
    ) -> Self {
        Self {
            queue,
            engine,
            running: Arc::new(AtomicBool::new(false)),
            thread_name,
            handle: None,
        }
    }

    /// Spawns the matching thread. No-op when already running.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::AcqRel) {
            return;
        }
        let queue = Arc::clone(&self.queue);
        let engine = Arc::clone(&self.engine);
        let running = Arc::clone(&self.running);
        let handle = thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || {
                debug!("order processor started");
                while running.load(Ordering::Acquire) {
                    match queue.try_pop() {
                        Some(order) => engine.process(order),
                        None => thread::yield_now(),
                    }
                }
                debug!("order processor stopped");
            })
            .expect("failed to spawn order processor thread");
        self.handle = Some(handle);
    }

    /// Stops the matching thread and joins it. Orders already dequeued
    /// finish processing; orders still in the inbound queue are discarded.
    /// No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        // The matching thread is gone, so the consumer role is briefly
        // ours: drop whatever it never got to.
        while self.queue.try_pop().is_some() {}
    }

    /// Whether the matching thread is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for OrderProcessor {
    fn drop(&mut self) {
        self.stop();
    }
}
