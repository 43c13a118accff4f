//! Unit of work: batches domain events until the caller commits.
//!
//! Handlers only ever [`enqueue`](UnitOfWork::enqueue). The caller runs the
//! handler's effect and calls [`commit`](UnitOfWork::commit) only if it
//! succeeded, so an event becomes externally visible strictly after the state
//! change it describes was persisted. Nothing is rolled back on failure.

use crate::domain::TodoEvent;
use effect_todo_core::event_bus::EventBus;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Pending-event queue bound to an event bus.
///
/// Shared between the caller and a handler as `Arc<UnitOfWork>`.
pub struct UnitOfWork {
    bus: Arc<dyn EventBus<TodoEvent>>,
    events: Mutex<Vec<TodoEvent>>,
}

impl UnitOfWork {
    /// Create an empty unit of work publishing to `bus`
    #[must_use]
    pub fn new(bus: Arc<dyn EventBus<TodoEvent>>) -> Self {
        Self {
            bus,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Append an event to the queue.
    pub fn enqueue(&self, event: TodoEvent) {
        tracing::debug!(
            event_type = event.kind().as_str(),
            todo_id = %event.todo_id(),
            "Event enqueued"
        );
        self.lock().push(event);
    }

    /// Snapshot of the queued events, in enqueue order.
    #[must_use]
    pub fn pending(&self) -> Vec<TodoEvent> {
        self.lock().clone()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish every queued event in order, then leave the queue empty.
    ///
    /// Returns the number of events published.
    pub fn commit(&self) -> usize {
        let events = std::mem::take(&mut *self.lock());
        for event in &events {
            self.bus.publish(event);
        }
        tracing::info!(count = events.len(), "Unit of work committed");
        events.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TodoEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}
