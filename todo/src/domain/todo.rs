//! The `Todo` entity and its lifecycle.
//!
//! ```text
//!   [create] ──▶ Active ──complete──▶ Completed
//!                  ▲  │                 │  │
//!                  │  └─────archive─────┼──┼──▶ Archived (terminal)
//!                  └──────reopen────────┘  │        ▲
//!                                          └archive─┘
//! ```
//!
//! Each state is its own struct, and the transition functions take the exact
//! source state by value, so an invalid transition does not type-check.
//! Handlers that load a [`Todo`] from storage match on the variant first and
//! turn a mismatch into a `CommandError::InvalidState`.

use super::values::{Priority, Timestamp, TodoDescription, TodoId, TodoTitle};
use effect_todo_core::environment::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields shared by every state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoBase {
    id: TodoId,
    title: TodoTitle,
    description: Option<TodoDescription>,
    priority: Priority,
    created_at: Timestamp,
}

impl TodoBase {
    /// The identifier.
    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    /// The title.
    #[must_use]
    pub const fn title(&self) -> &TodoTitle {
        &self.title
    }

    /// The description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TodoDescription> {
        self.description.as_ref()
    }

    /// The priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// When the todo was created.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// A todo that is pending completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTodo {
    base: TodoBase,
}

/// A todo that has been marked as done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedTodo {
    base: TodoBase,
    completed_at: Timestamp,
}

/// A todo that has been soft-deleted. No transitions leave this state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedTodo {
    base: TodoBase,
    archived_at: Timestamp,
}

impl ActiveTodo {
    /// Shared fields.
    #[must_use]
    pub const fn base(&self) -> &TodoBase {
        &self.base
    }
}

impl CompletedTodo {
    /// Shared fields.
    #[must_use]
    pub const fn base(&self) -> &TodoBase {
        &self.base
    }

    /// When the todo was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Timestamp {
        self.completed_at
    }
}

impl ArchivedTodo {
    /// Shared fields.
    #[must_use]
    pub const fn base(&self) -> &TodoBase {
        &self.base
    }

    /// When the todo was archived.
    #[must_use]
    pub const fn archived_at(&self) -> Timestamp {
        self.archived_at
    }
}

/// Fieldless mirror of the [`Todo`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TodoStatus {
    /// Pending completion
    Active,
    /// Done
    Completed,
    /// Soft-deleted
    Archived,
}

impl TodoStatus {
    /// The status name as it appears at the boundary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A todo in exactly one of its three states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Todo {
    /// See [`ActiveTodo`]
    Active(ActiveTodo),
    /// See [`CompletedTodo`]
    Completed(CompletedTodo),
    /// See [`ArchivedTodo`]
    Archived(ArchivedTodo),
}

impl Todo {
    /// Shared fields, whatever the state.
    #[must_use]
    pub const fn base(&self) -> &TodoBase {
        match self {
            Self::Active(todo) => &todo.base,
            Self::Completed(todo) => &todo.base,
            Self::Archived(todo) => &todo.base,
        }
    }

    /// The identifier.
    #[must_use]
    pub const fn id(&self) -> &TodoId {
        self.base().id()
    }

    /// When the todo was created.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.base().created_at()
    }

    /// The current state.
    #[must_use]
    pub const fn status(&self) -> TodoStatus {
        match self {
            Self::Active(_) => TodoStatus::Active,
            Self::Completed(_) => TodoStatus::Completed,
            Self::Archived(_) => TodoStatus::Archived,
        }
    }
}

impl From<ActiveTodo> for Todo {
    fn from(todo: ActiveTodo) -> Self {
        Self::Active(todo)
    }
}

impl From<CompletedTodo> for Todo {
    fn from(todo: CompletedTodo) -> Self {
        Self::Completed(todo)
    }
}

impl From<ArchivedTodo> for Todo {
    fn from(todo: ArchivedTodo) -> Self {
        Self::Archived(todo)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ActiveTodo {}
    impl Sealed for super::CompletedTodo {}
}

/// States [`archive`] accepts: [`ActiveTodo`] and [`CompletedTodo`].
pub trait Archivable: sealed::Sealed {
    /// Drop state-specific fields and keep the shared ones.
    fn into_base(self) -> TodoBase;
}

impl Archivable for ActiveTodo {
    fn into_base(self) -> TodoBase {
        self.base
    }
}

impl Archivable for CompletedTodo {
    fn into_base(self) -> TodoBase {
        self.base
    }
}

/// Start a new todo in the `Active` state.
#[must_use]
pub fn create(
    id: TodoId,
    title: TodoTitle,
    description: Option<TodoDescription>,
    priority: Priority,
    clock: &dyn Clock,
) -> ActiveTodo {
    ActiveTodo {
        base: TodoBase {
            id,
            title,
            description,
            priority,
            created_at: Timestamp::now(clock),
        },
    }
}

/// `Active → Completed`.
#[must_use]
pub fn complete(todo: ActiveTodo, clock: &dyn Clock) -> CompletedTodo {
    CompletedTodo {
        base: todo.base,
        completed_at: Timestamp::now(clock),
    }
}

/// `Completed → Active`; the completion time is discarded.
#[must_use]
pub fn reopen(todo: CompletedTodo) -> ActiveTodo {
    ActiveTodo { base: todo.base }
}

/// `Active | Completed → Archived`; any completion time is discarded.
#[must_use]
pub fn archive(todo: impl Archivable, clock: &dyn Clock) -> ArchivedTodo {
    ArchivedTodo {
        base: todo.into_base(),
        archived_at: Timestamp::now(clock),
    }
}
