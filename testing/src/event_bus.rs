//! In-memory event bus that records every published event.
//!
//! [`RecordingEventBus`] behaves like
//! [`LocalEventBus`](effect_todo_core::LocalEventBus) (subscribers are still
//! called) and additionally keeps a log of everything published, so tests can
//! assert on what a unit of work actually emitted.

use effect_todo_core::event_bus::{EventBus, Handler, LocalEventBus, Subscription};
use std::sync::{Arc, Mutex, PoisonError};

/// Event bus that captures published events for assertions.
///
/// # Example
///
/// ```
/// use effect_todo_core::EventBus;
/// use effect_todo_testing::RecordingEventBus;
///
/// let bus = RecordingEventBus::new();
/// bus.publish(&"created");
/// bus.publish(&"completed");
///
/// assert_eq!(bus.published(), vec!["created", "completed"]);
/// ```
#[derive(Debug)]
pub struct RecordingEventBus<E> {
    inner: LocalEventBus<E>,
    published: Arc<Mutex<Vec<E>>>,
}

impl<E: Clone> RecordingEventBus<E> {
    /// Create an empty recording bus
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: LocalEventBus::new(),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All events published so far, in publication order
    #[must_use]
    pub fn published(&self) -> Vec<E> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events published so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if nothing has been published
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget recorded events (for test isolation)
    pub fn clear(&self) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<E: Clone> Default for RecordingEventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> for RecordingEventBus<E>
where
    E: Clone + Send + 'static,
{
    fn publish(&self, event: &E) {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        self.inner.publish(event);
    }

    fn subscribe(&self, handler: Handler<E>) -> Subscription {
        self.inner.subscribe(handler)
    }
}
