//! Domain events emitted by successful commands.

use super::values::{Timestamp, TodoId};
use effect_todo_core::environment::Clock;
use effect_todo_core::event::Event;
use serde::Serialize;
use std::fmt;

/// What happened to the todo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TodoEventKind {
    /// A todo was created
    Created,
    /// An active todo was completed
    Completed,
    /// A completed todo was reopened
    Reopened,
    /// A todo was archived
    Archived,
}

impl TodoEventKind {
    /// The event type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Completed => "Completed",
            Self::Reopened => "Reopened",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for TodoEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of a lifecycle change.
///
/// Serializes as `{"type": "Created", "todoId": "todo-…", "at": "…Z"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoEvent {
    #[serde(rename = "type")]
    kind: TodoEventKind,
    todo_id: TodoId,
    at: Timestamp,
}

impl TodoEvent {
    fn new(kind: TodoEventKind, todo_id: TodoId, clock: &dyn Clock) -> Self {
        Self {
            kind,
            todo_id,
            at: Timestamp::now(clock),
        }
    }

    /// `todo_id` was created.
    #[must_use]
    pub fn created(todo_id: TodoId, clock: &dyn Clock) -> Self {
        Self::new(TodoEventKind::Created, todo_id, clock)
    }

    /// `todo_id` was completed.
    #[must_use]
    pub fn completed(todo_id: TodoId, clock: &dyn Clock) -> Self {
        Self::new(TodoEventKind::Completed, todo_id, clock)
    }

    /// `todo_id` was reopened.
    #[must_use]
    pub fn reopened(todo_id: TodoId, clock: &dyn Clock) -> Self {
        Self::new(TodoEventKind::Reopened, todo_id, clock)
    }

    /// `todo_id` was archived.
    #[must_use]
    pub fn archived(todo_id: TodoId, clock: &dyn Clock) -> Self {
        Self::new(TodoEventKind::Archived, todo_id, clock)
    }

    /// What happened.
    #[must_use]
    pub const fn kind(&self) -> TodoEventKind {
        self.kind
    }

    /// The todo it happened to.
    #[must_use]
    pub const fn todo_id(&self) -> &TodoId {
        &self.todo_id
    }

    /// When it happened.
    #[must_use]
    pub const fn at(&self) -> Timestamp {
        self.at
    }
}

impl Event for TodoEvent {
    fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }
}
