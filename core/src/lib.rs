//! # Effect Todo Core
//!
//! Core primitives shared by the effect-todo crates.
//!
//! This crate provides the small set of abstractions the domain and
//! application layers are built on:
//!
//! - **Effect**: a deferred, composable, failure-typed async computation
//! - **Environment**: injected dependencies (the [`environment::Clock`])
//! - **Event**: the trait every domain event implements
//! - **Event bus**: synchronous publish/subscribe fan-out
//!
//! ## Architecture Principles
//!
//! - Errors are values, carried in the failure channel of an [`Effect`]
//! - Nothing runs until an effect is explicitly `run`
//! - Dependencies are injected, never global
//!
//! ## Example
//!
//! ```
//! use effect_todo_core::Effect;
//!
//! # tokio_test::block_on(async {
//! let effect = Effect::<i32, String>::succeed(20)
//!     .map(|n| n + 1)
//!     .flat_map(|n| Effect::succeed(n * 2));
//!
//! assert_eq!(effect.run().await, Ok(42));
//! # });
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod effect;
pub mod event;
pub mod event_bus;

pub use effect::{Effect, Fault};
pub use event::Event;
pub use event_bus::{EventBus, LocalEventBus, Subscription};

/// Environment module - Dependency injection traits
///
/// All external dependencies the domain needs (currently only time) are
/// abstracted behind traits and injected by the caller.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use effect_todo_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
