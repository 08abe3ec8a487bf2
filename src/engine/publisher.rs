//! Outbound event plumbing: publisher on the matching side, output handler
//! on the ingress side.

use crate::events::Event;
use crate::queue::SpscQueue;
use std::sync::Arc;
use tracing::warn;

/// Callback invoked for every drained event, shared across threads.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Sole producer identity for an instrument's outbound queue.
///
/// Publishing never blocks the matching thread: when the queue is full the
/// event is dropped and logged, and the engine moves on.
pub struct EventPublisher {
    queue: Arc<SpscQueue<Event>>,
}

impl EventPublisher {
    /// Wraps the producer end of `queue`.
    pub fn new(queue: Arc<SpscQueue<Event>>) -> Self {
        Self { queue }
    }

    /// Pushes `event` onto the outbound queue. Returns whether it was
    /// accepted; a full queue drops the event.
    pub fn publish(&self, event: Event) -> bool {
        match self.queue.try_push(event) {
            Ok(()) => true,
            Err(event) => {
                warn!(
                    "event queue full, dropping {} for order {}",
                    event.kind(),
                    event.order_id()
                );
                false
            }
        }
    }
}

/// Sole consumer identity for an instrument's outbound queue.
///
/// Draining happens on the caller's thread, never the matching thread; the
/// callback is invoked synchronously per event.
pub struct OutputHandler {
    queue: Arc<SpscQueue<Event>>,
    callback: Option<EventCallback>,
}

impl OutputHandler {
    /// Wraps the consumer end of `queue` with no callback installed.
    pub fn new(queue: Arc<SpscQueue<Event>>) -> Self {
        Self {
            queue,
            callback: None,
        }
    }

    /// Installs the callback invoked for each drained event.
    pub fn set_callback(&mut self, callback: EventCallback) {
        self.callback = Some(callback);
    }

    /// Whether undrained events are waiting.
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Drains all currently available events, invoking the callback for
    /// each. Events drained without a callback installed are discarded.
    /// Returns the number of events drained.
    pub fn process_events(&mut self) -> usize {
        let mut drained = 0;
        while let Some(event) = self.queue.try_pop() {
            drained += 1;
            if let Some(callback) = &self.callback {
                callback(&event);
            }
        }
        drained
    }
}
