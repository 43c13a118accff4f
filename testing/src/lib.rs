//! # Effect Todo Testing
//!
//! Testing utilities and helpers for the effect-todo crates.
//!
//! This crate provides:
//! - Deterministic [`Clock`] implementations
//! - A [`RecordingEventBus`] that captures everything published to it
//! - [`EffectTest`], a Given-When-Then runner for effects
//!
//! ## Example
//!
//! ```ignore
//! use effect_todo_testing::{test_clock, EffectTest};
//!
//! #[tokio::test]
//! async fn test_create_flow() {
//!     let clock = Arc::new(test_clock());
//!     let commands = TodoCommands::new(repository, clock);
//!
//!     EffectTest::new(commands.create(&uow, input))
//!         .then_ok(|dto| assert_eq!(dto.status, TodoStatus::Active))
//!         .run()
//!         .await;
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use effect_todo_core::environment::Clock;

pub mod event_bus;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Mutex, PoisonError};

    /// Clock frozen at a single instant.
    ///
    /// ```
    /// use effect_todo_core::environment::Clock;
    /// use effect_todo_testing::mocks::FixedClock;
    /// use chrono::Utc;
    ///
    /// let frozen = FixedClock::new(Utc::now());
    /// assert_eq!(frozen.now(), frozen.now());
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock {
        at: DateTime<Utc>,
    }

    impl FixedClock {
        /// Freeze the clock at `at`
        #[must_use]
        pub const fn new(at: DateTime<Utc>) -> Self {
            Self { at }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.at
        }
    }

    /// Clock that moves forward by a fixed step on every reading.
    ///
    /// Useful where ordering by timestamp matters: each entity created in a
    /// test gets a strictly later `created_at` than the one before.
    ///
    /// # Example
    ///
    /// ```
    /// use effect_todo_testing::mocks::SteppingClock;
    /// use effect_todo_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = SteppingClock::new(start, Duration::seconds(1));
    /// assert_eq!(clock.now(), start);
    /// assert_eq!(clock.now(), start + Duration::seconds(1));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let current = *next;
            *next = current + self.step;
            current
        }
    }

    /// Unix milliseconds of 2025-01-01T00:00:00Z, the instant test clocks start at
    pub const TEST_EPOCH_MILLIS: i64 = 1_735_689_600_000;

    /// Fixed clock at 2025-01-01T00:00:00Z
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(TEST_EPOCH_MILLIS))
    }

    /// Create a stepping clock starting at 2025-01-01 00:00:00 UTC that
    /// advances one second per reading
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(test_clock().now(), Duration::seconds(1))
    }
}

// Re-export commonly used items
pub use effect_test::{EffectTest, assertions};
pub use event_bus::RecordingEventBus;
pub use mocks::{FixedClock, SteppingClock, TEST_EPOCH_MILLIS, stepping_clock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_clock_is_frozen_at_epoch() {
        let clock = test_clock();
        assert_eq!(clock.now().timestamp_millis(), mocks::TEST_EPOCH_MILLIS);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_stepping_clock_advances() {
        let clock = stepping_clock();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::seconds(1));
    }
}
