//! Tests for the testing utilities used together

#![allow(clippy::unwrap_used)] // Tests can unwrap

use effect_todo_core::environment::Clock;
use effect_todo_core::{Effect, EventBus, Fault};
use effect_todo_testing::{EffectTest, RecordingEventBus, stepping_clock, test_clock};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
enum TestEvent {
    Started { at: i64 },
    Stopped { at: i64 },
}

/// Effect that records a start and stop event, reading time from `clock`
fn session(
    bus: Arc<RecordingEventBus<TestEvent>>,
    clock: Arc<dyn Clock>,
) -> Effect<i64, String> {
    Effect::from_fn(move || {
        let start = clock.now().timestamp();
        bus.publish(&TestEvent::Started { at: start });
        let stop = clock.now().timestamp();
        bus.publish(&TestEvent::Stopped { at: stop });
        Ok(stop - start)
    })
}

#[tokio::test]
async fn test_session_with_stepping_clock() {
    let bus = Arc::new(RecordingEventBus::new());
    let clock = Arc::new(stepping_clock());
    let base = test_clock().now().timestamp();

    EffectTest::new(session(Arc::clone(&bus), clock))
        .then_ok(|elapsed| assert_eq!(*elapsed, 1))
        .run()
        .await;

    assert_eq!(
        bus.published(),
        vec![
            TestEvent::Started { at: base },
            TestEvent::Stopped { at: base + 1 },
        ]
    );
}

#[tokio::test]
async fn test_nothing_recorded_until_run() {
    let bus = Arc::new(RecordingEventBus::new());
    let pending = session(Arc::clone(&bus), Arc::new(test_clock()));

    assert!(bus.is_empty());

    assert_eq!(pending.run().await.unwrap(), 0);
    assert_eq!(bus.len(), 2);
}

#[tokio::test]
async fn test_failed_adapter_surfaces_as_typed_error() {
    let effect: Effect<i64, String> = Effect::from_future(
        || async { Err::<i64, _>("store offline") },
        |fault: Fault<&str>| fault.to_string(),
    );

    EffectTest::new(effect)
        .then_err(|error| assert_eq!(error, "operation rejected: store offline"))
        .run()
        .await;
}
