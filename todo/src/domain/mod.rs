//! Domain layer: value objects, the `Todo` state machine, events and projections.
//!
//! Everything here is pure and synchronous. Time enters only through an
//! injected [`Clock`](effect_todo_core::environment::Clock).

pub mod event;
pub mod projection;
pub mod todo;
pub mod values;

pub use event::{TodoEvent, TodoEventKind};
pub use projection::TodoDto;
pub use todo::{
    ActiveTodo, Archivable, ArchivedTodo, CompletedTodo, Todo, TodoBase, TodoStatus, archive,
    complete, create, reopen,
};
pub use values::{Priority, Timestamp, TodoDescription, TodoId, TodoTitle};
