//! Event trait for domain events.
//!
//! Events represent immutable facts about things that have already happened.
//! They are created by the application layer after a successful state change,
//! queued in a unit of work and published through an
//! [`EventBus`](crate::event_bus::EventBus).
//!
//! # Example
//!
//! ```
//! use effect_todo_core::event::Event;
//!
//! #[derive(Clone, Debug)]
//! enum OrderEvent {
//!     OrderPlaced { order_id: String },
//!     OrderShipped { order_id: String },
//! }
//!
//! impl Event for OrderEvent {
//!     fn event_type(&self) -> &'static str {
//!         match self {
//!             OrderEvent::OrderPlaced { .. } => "OrderPlaced",
//!             OrderEvent::OrderShipped { .. } => "OrderShipped",
//!         }
//!     }
//! }
//!
//! let event = OrderEvent::OrderPlaced { order_id: "order-1".to_string() };
//! assert_eq!(event.event_type(), "OrderPlaced");
//! ```

/// An immutable record of something that happened in the domain.
///
/// Events must be `Send + Sync + 'static` so they can cross the event bus
/// and be handed to subscribers running anywhere in the process.
pub trait Event: Send + Sync + 'static {
    /// Returns the stable type name of this event.
    ///
    /// Used for logging and for routing in subscribers.
    fn event_type(&self) -> &'static str;
}
