//! Todo lifecycle built on deferred effects, a type-enforced state machine and
//! a unit of work.
//!
//! This crate demonstrates:
//!
//! - Validated value objects (`TodoId`, `TodoTitle`, `Priority`, ...)
//! - A `Todo` sum type whose transitions only accept their legal source state
//! - Command handlers returning `Effect<TodoDto, CommandError>`
//! - Events that are enqueued during a command and published on commit
//! - Environment-based configuration and an explicit composition root
//!
//! # Quick Start
//!
//! ```
//! use effect_todo::{App, AppConfig, CreateTodoInput, TodoStatus};
//!
//! # tokio_test::block_on(async {
//! let app = App::new(AppConfig::default());
//!
//! let todo = app
//!     .execute(|commands, uow| commands.create(uow, CreateTodoInput::new("Buy milk")))
//!     .await
//!     .unwrap();
//! let done = app
//!     .execute(|commands, uow| commands.complete(uow, &todo.id))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(done.status, TodoStatus::Completed);
//! assert_eq!(app.list().await.len(), 1);
//! # });
//! ```

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod repository;

// Re-export commonly used types
pub use app::App;
pub use application::{
    CommandError, CreateTodoInput, ErrorKind, FieldError, TodoCommands, TodoFilter, TodoQueries,
    UnitOfWork,
};
pub use config::{AppConfig, ConfigError, Environment};
pub use domain::{Priority, Todo, TodoDto, TodoEvent, TodoEventKind, TodoId, TodoStatus};
pub use repository::{InMemoryTodoRepository, TodoRepository};
