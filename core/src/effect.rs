//! Deferred, failure-typed computations.
//!
//! An [`Effect<T, E>`] describes an asynchronous computation that, once
//! [`run`](Effect::run), resolves to exactly one `Result<T, E>`. Building an
//! effect performs no work; composing effects with [`map`](Effect::map) and
//! [`flat_map`](Effect::flat_map) only builds a larger description.
//!
//! Failures are values. The only place an external operation can enter the
//! pipeline is [`Effect::from_future`], which catches both returned errors and
//! panics and turns them into a typed failure.
//!
//! # Laws
//!
//! - `Effect::succeed(v).flat_map(f)` behaves like `f(v)`
//! - `Effect::fail(e).flat_map(f)` behaves like `Effect::fail(e)` and never calls `f`
//! - `effect.map(f)` behaves like `effect.flat_map(|x| Effect::succeed(f(x)))`
//!
//! # Example
//!
//! ```
//! use effect_todo_core::{Effect, Fault};
//!
//! # tokio_test::block_on(async {
//! let lookup = Effect::from_future(
//!     || async { "42".parse::<u32>() },
//!     |fault: Fault<std::num::ParseIntError>| fault.to_string(),
//! );
//!
//! let doubled = lookup.map(|n| n * 2);
//! assert_eq!(doubled.run().await, Ok(84));
//! # });
//! ```

use futures::future::{self, BoxFuture, FutureExt};
use std::any::Any;
use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

/// Boxed deferred computation behind every [`Effect`].
type Thunk<T, E> = Box<dyn FnOnce() -> BoxFuture<'static, Result<T, E>> + Send>;

/// A fault caught while running an external operation in [`Effect::from_future`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault<X> {
    /// The operation completed with an error.
    #[error("operation rejected: {0}")]
    Rejected(X),

    /// The operation panicked; carries the panic message when one was available.
    #[error("operation panicked: {0}")]
    Panicked(String),
}

/// A deferred asynchronous computation producing exactly one `Result<T, E>`.
///
/// Effects are `Send + 'static`, so a composed pipeline can be handed to
/// `tokio::spawn` as well as awaited in place.
#[must_use = "effects do nothing unless `run` is awaited"]
pub struct Effect<T, E> {
    thunk: Thunk<T, E>,
}

impl<T, E> fmt::Debug for Effect<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Effect(<deferred>)")
    }
}

impl<T, E> Effect<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Build an effect from a closure producing a future.
    ///
    /// The closure is not called until the effect is run.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            thunk: Box::new(move || f().boxed()),
        }
    }

    /// An effect that immediately succeeds with `value`.
    pub fn succeed(value: T) -> Self {
        Self::from_result(Ok(value))
    }

    /// An effect that immediately fails with `error`.
    pub fn fail(error: E) -> Self {
        Self::from_result(Err(error))
    }

    /// Lift an already computed result.
    pub fn from_result(result: Result<T, E>) -> Self {
        Self::new(move || future::ready(result))
    }

    /// Defer a synchronous fallible computation until the effect is run.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        Self::new(move || future::ready(f()))
    }

    /// Adapt an external asynchronous operation.
    ///
    /// `thunk` is only invoked when the effect runs. An `Err` returned by the
    /// operation becomes [`Fault::Rejected`]; a panic while creating or polling
    /// the future becomes [`Fault::Panicked`]. Both are passed to `on_error`,
    /// so the resulting effect never unwinds.
    pub fn from_future<X, F, Fut, H>(thunk: F, on_error: H) -> Self
    where
        X: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, X>> + Send + 'static,
        H: FnOnce(Fault<X>) -> E + Send + 'static,
    {
        Self::new(move || async move {
            let outcome = AssertUnwindSafe(async move { thunk().await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(rejection)) => Err(on_error(Fault::Rejected(rejection))),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::trace!(%message, "Caught panic inside Effect::from_future");
                    Err(on_error(Fault::Panicked(message)))
                },
            }
        })
    }

    /// Transform the success value; failures pass through untouched.
    pub fn map<U, F>(self, f: F) -> Effect<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        Effect::new(move || async move { self.run().await.map(f) })
    }

    /// Sequence a dependent effect.
    ///
    /// On success `f` is called with the value and its effect is run; on
    /// failure `f` is never called and the failure is returned as is.
    pub fn flat_map<U, F>(self, f: F) -> Effect<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Effect<U, E> + Send + 'static,
    {
        Effect::new(move || async move {
            match self.run().await {
                Ok(value) => f(value).run().await,
                Err(error) => Err(error),
            }
        })
    }

    /// Transform the failure value; successes pass through untouched.
    pub fn map_err<E2, F>(self, f: F) -> Effect<T, E2>
    where
        E2: Send + 'static,
        F: FnOnce(E) -> E2 + Send + 'static,
    {
        Effect::new(move || async move { self.run().await.map_err(f) })
    }

    /// Execute the computation.
    pub fn run(self) -> BoxFuture<'static, Result<T, E>> {
        (self.thunk)()
    }
}

impl<T> Effect<T, Infallible>
where
    T: Send + 'static,
{
    /// Reinterpret an effect that cannot fail as one with any error type.
    pub fn widen<E>(self) -> Effect<T, E>
    where
        E: Send + 'static,
    {
        self.map_err(|never| match never {})
    }

    /// Run an effect that cannot fail and return its value directly.
    pub async fn value(self) -> T {
        match self.run().await {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
