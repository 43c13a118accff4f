//! Event bus abstraction for in-process publish/subscribe.
//!
//! This module provides the [`EventBus`] trait and [`LocalEventBus`], a
//! synchronous fan-out implementation. Events reach the bus only when a unit
//! of work is committed, after the state change they describe has been
//! persisted.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Command   │
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────────┐
//! │ 1. Persist +    │
//! │ enqueue in UoW  │
//! └────────┬────────┘
//!          │ commit (success only)
//!          ▼
//! ┌─────────────────┐
//! │ 2. Publish to   │
//! │    Event Bus    │
//! └────────┬────────┘
//!          │
//!     ┌────┴────┐
//!     ▼         ▼
//! ┌───────┐ ┌───────┐
//! │ Sub 1 │ │ Sub 2 │
//! └───────┘ └───────┘
//! ```
//!
//! # Delivery
//!
//! - Publishing is fire-and-forget and synchronous: every current subscriber
//!   has been called by the time `publish` returns.
//! - Subscribers are called in subscription order.
//! - Handlers run outside the registry lock, so a handler may subscribe or
//!   unsubscribe without deadlocking.
//!
//! # Example
//!
//! ```
//! use effect_todo_core::event_bus::{EventBus, LocalEventBus};
//! use std::sync::{Arc, Mutex};
//!
//! let bus = LocalEventBus::<String>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let subscription = bus.subscribe(Box::new(move |event: &String| {
//!     sink.lock().unwrap().push(event.clone());
//! }));
//!
//! bus.publish(&"hello".to_string());
//! subscription.unsubscribe();
//! bus.publish(&"ignored".to_string());
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["hello".to_string()]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// A subscriber callback.
pub type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Trait for event bus implementations.
///
/// # Dyn Compatibility
///
/// The trait takes boxed handlers so it can be used as `Arc<dyn EventBus<E>>`,
/// which is how units of work hold their bus.
pub trait EventBus<E>: Send + Sync {
    /// Deliver `event` to every current subscriber.
    fn publish(&self, event: &E);

    /// Register `handler` and return a handle that can remove it again.
    ///
    /// Dropping the returned [`Subscription`] without calling
    /// [`Subscription::unsubscribe`] leaves the handler registered.
    fn subscribe(&self, handler: Handler<E>) -> Subscription;
}

/// Handle returned by [`EventBus::subscribe`].
pub struct Subscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() -> bool + Send + Sync>>,
}

impl Subscription {
    /// Create a subscription handle.
    ///
    /// `cancel` removes the handler and reports whether it was still registered.
    #[must_use]
    pub fn new(id: u64, cancel: impl FnOnce() -> bool + Send + Sync + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Identifier of the subscription within its bus.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Remove the handler from the bus.
    ///
    /// Returns `false` if the handler was already gone (or the bus dropped).
    pub fn unsubscribe(mut self) -> bool {
        self.cancel.take().is_some_and(|cancel| cancel())
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

struct Registry<E> {
    next_id: AtomicU64,
    handlers: RwLock<Vec<(u64, Arc<dyn Fn(&E) + Send + Sync>)>>,
}

impl<E> Registry<E> {
    fn remove(&self, id: u64) -> bool {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }
}

/// Synchronous in-process event bus.
///
/// Cloning the bus yields another handle to the same set of subscribers.
pub struct LocalEventBus<E> {
    registry: Arc<Registry<E>>,
}

impl<E> LocalEventBus<E> {
    /// Create a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                handlers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<E> Default for LocalEventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for LocalEventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> fmt::Debug for LocalEventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<E> EventBus<E> for LocalEventBus<E>
where
    E: 'static,
{
    fn publish(&self, event: &E) {
        // Snapshot so handlers run without holding the lock
        let handlers: Vec<_> = self
            .registry
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        tracing::trace!(subscribers = handlers.len(), "Publishing event");

        for handler in handlers {
            handler(event);
        }
    }

    fn subscribe(&self, handler: Handler<E>) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::from(handler)));

        tracing::debug!(subscription_id = id, "Subscriber registered");

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        Subscription::new(id, move || {
            registry
                .upgrade()
                .is_some_and(|registry| registry.remove(id))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<i32>>>, Handler<i32>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: Handler<i32> = Box::new(move |event: &i32| sink.lock().unwrap().push(*event));
        (seen, handler)
    }

    #[test]
    fn test_publishes_to_subscriber() {
        let bus = LocalEventBus::new();
        let (seen, handler) = recorder();
        let _subscription = bus.subscribe(handler);

        bus.publish(&1);

        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_fans_out_to_every_subscriber() {
        let bus = LocalEventBus::new();
        let (first, h1) = recorder();
        let (second, h2) = recorder();
        let _s1 = bus.subscribe(h1);
        let _s2 = bus.subscribe(h2);

        bus.publish(&7);

        assert_eq!(*first.lock().unwrap(), vec![7]);
        assert_eq!(*second.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_unsubscribe_removes_handler() {
        let bus = LocalEventBus::new();
        let (seen, handler) = recorder();
        let subscription = bus.subscribe(handler);

        assert!(subscription.unsubscribe());
        bus.publish(&1);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_dropping_subscription_keeps_handler() {
        let bus = LocalEventBus::new();
        let (seen, handler) = recorder();
        drop(bus.subscribe(handler));

        bus.publish(&3);

        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_delivers_multiple_events_in_order() {
        let bus = LocalEventBus::new();
        let (seen, handler) = recorder();
        let _subscription = bus.subscribe(handler);

        bus.publish(&1);
        bus.publish(&2);
        bus.publish(&3);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped() {
        let bus = LocalEventBus::<i32>::new();
        let (_seen, handler) = recorder();
        let subscription = bus.subscribe(handler);
        drop(bus);

        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_subscription_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Subscription>();
        assert_send_sync::<LocalEventBus<i32>>();
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = LocalEventBus::new();
        let other = bus.clone();
        let (seen, handler) = recorder();
        let _subscription = other.subscribe(handler);

        bus.publish(&9);

        assert_eq!(*seen.lock().unwrap(), vec![9]);
    }
}
