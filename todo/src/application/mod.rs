//! Application layer: command and query handlers, their errors, and the unit
//! of work that defers event publication until the caller commits.

pub mod commands;
pub mod error;
pub mod queries;
pub mod uow;

pub use commands::{CreateTodoInput, TodoCommands};
pub use error::{ARCHIVABLE_STATES, CommandError, ErrorKind, FieldError};
pub use queries::{FilteredTodos, TodoCounts, TodoFilter, TodoQueries, filter_todos};
pub use uow::UnitOfWork;
