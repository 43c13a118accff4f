//! Command handlers: create, complete, reopen and archive.
//!
//! Every handler returns a deferred [`Effect`]. When run, it executes
//! validate → load → guard → transition → persist → enqueue, short-circuiting
//! on the first failure. Events are only enqueued in the unit of work; the
//! caller decides whether to commit.

use super::error::{ARCHIVABLE_STATES, CommandError, FieldError};
use super::uow::UnitOfWork;
use crate::domain::{
    self, Priority, Todo, TodoDescription, TodoDto, TodoEvent, TodoId, TodoStatus, TodoTitle,
};
use crate::repository::TodoRepository;
use effect_todo_core::Effect;
use effect_todo_core::environment::Clock;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Raw input for creating a todo, as received from a boundary.
///
/// Missing fields deserialize to empty/absent values and are then handled by
/// validation (a missing title fails with `Title required`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CreateTodoInput {
    /// Title, trimmed during validation
    #[serde(default)]
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional priority name (`Low`, `Medium`, `High`)
    #[serde(default)]
    pub priority: Option<String>,
}

impl CreateTodoInput {
    /// Input with only a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority name
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

struct NewTodo {
    title: TodoTitle,
    description: Option<TodoDescription>,
    priority: Priority,
}

/// Validate every field independently and report all failures together.
fn validate(input: &CreateTodoInput) -> Result<NewTodo, CommandError> {
    let title = TodoTitle::create(&input.title);
    let description = TodoDescription::create(input.description.as_deref());
    let priority = Priority::create(input.priority.as_deref());

    match (title, description, priority) {
        (Ok(title), Ok(description), Ok(priority)) => Ok(NewTodo {
            title,
            description,
            priority,
        }),
        (title, description, priority) => {
            let errors: Vec<FieldError> = [
                title.err().map(|message| FieldError::new("title", message)),
                description
                    .err()
                    .map(|message| FieldError::new("description", message)),
                priority
                    .err()
                    .map(|message| FieldError::new("priority", message)),
            ]
            .into_iter()
            .flatten()
            .collect();

            tracing::debug!(failed_fields = errors.len(), "Create input rejected");
            Err(CommandError::Validation { errors })
        },
    }
}

/// Constructor for the event recorded after a successful transition.
type EventFor = fn(TodoId, &dyn Clock) -> TodoEvent;

/// Command handlers for the todo lifecycle.
///
/// Holds its dependencies explicitly; the unit of work is passed per call so
/// the caller owns the commit decision.
#[derive(Clone)]
pub struct TodoCommands {
    repository: Arc<dyn TodoRepository>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TodoCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoCommands").finish_non_exhaustive()
    }
}

impl TodoCommands {
    /// Create handlers over `repository`, reading time from `clock`
    #[must_use]
    pub fn new(repository: Arc<dyn TodoRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Create a new `Active` todo and enqueue `Created`.
    ///
    /// Fails with `Validation` listing every invalid field.
    pub fn create(
        &self,
        uow: &Arc<UnitOfWork>,
        input: CreateTodoInput,
    ) -> Effect<TodoDto, CommandError> {
        let repository = Arc::clone(&self.repository);
        let clock = Arc::clone(&self.clock);
        let uow = Arc::clone(uow);

        Effect::from_fn(move || validate(&input)).flat_map(move |new_todo| {
            let todo = domain::create(
                TodoId::generate(clock.as_ref()),
                new_todo.title,
                new_todo.description,
                new_todo.priority,
                clock.as_ref(),
            );
            tracing::debug!(todo_id = %todo.base().id(), "Creating todo");

            repository.save(todo.into()).widen().map(move |saved| {
                uow.enqueue(TodoEvent::created(saved.id().clone(), clock.as_ref()));
                TodoDto::from(&saved)
            })
        })
    }

    /// `Active → Completed`, enqueue `Completed`.
    ///
    /// Fails with `InvalidId`, `NotFound`, or `InvalidState{expected: "Active"}`.
    pub fn complete(&self, uow: &Arc<UnitOfWork>, id: &str) -> Effect<TodoDto, CommandError> {
        self.transition(uow, id, TodoEvent::completed, |todo, clock| match todo {
            Todo::Active(active) => Ok(domain::complete(active, clock).into()),
            other => Err(CommandError::invalid_state(
                TodoStatus::Active.as_str(),
                other.status(),
            )),
        })
    }

    /// `Completed → Active`, enqueue `Reopened`.
    ///
    /// Fails with `InvalidId`, `NotFound`, or `InvalidState{expected: "Completed"}`.
    pub fn reopen(&self, uow: &Arc<UnitOfWork>, id: &str) -> Effect<TodoDto, CommandError> {
        self.transition(uow, id, TodoEvent::reopened, |todo, _| match todo {
            Todo::Completed(completed) => Ok(domain::reopen(completed).into()),
            other => Err(CommandError::invalid_state(
                TodoStatus::Completed.as_str(),
                other.status(),
            )),
        })
    }

    /// `Active | Completed → Archived`, enqueue `Archived`.
    ///
    /// Fails with `InvalidId`, `NotFound`, or
    /// `InvalidState{expected: "Active|Completed", actual: "Archived"}`.
    pub fn archive(&self, uow: &Arc<UnitOfWork>, id: &str) -> Effect<TodoDto, CommandError> {
        self.transition(uow, id, TodoEvent::archived, |todo, clock| match todo {
            Todo::Active(active) => Ok(domain::archive(active, clock).into()),
            Todo::Completed(completed) => Ok(domain::archive(completed, clock).into()),
            Todo::Archived(_) => Err(CommandError::invalid_state(
                ARCHIVABLE_STATES,
                TodoStatus::Archived,
            )),
        })
    }

    /// Shared pipeline for commands addressing an existing todo.
    ///
    /// `guard` both checks the current state and performs the transition.
    fn transition<G>(
        &self,
        uow: &Arc<UnitOfWork>,
        raw_id: &str,
        event_for: EventFor,
        guard: G,
    ) -> Effect<TodoDto, CommandError>
    where
        G: FnOnce(Todo, &dyn Clock) -> Result<Todo, CommandError> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let clock = Arc::clone(&self.clock);
        let uow = Arc::clone(uow);
        let raw_id = raw_id.to_string();

        Effect::from_fn(move || TodoId::parse(&raw_id).map_err(CommandError::invalid_id)).flat_map(
            move |id| {
                repository.find_by_id(&id).widen().flat_map(move |found| {
                    let Some(todo) = found else {
                        tracing::debug!(todo_id = %id, "Todo not found");
                        return Effect::fail(CommandError::NotFound);
                    };

                    let from = todo.status();
                    let next = match guard(todo, clock.as_ref()) {
                        Ok(next) => next,
                        Err(error) => {
                            tracing::debug!(todo_id = %id, %from, "Transition rejected");
                            return Effect::fail(error);
                        },
                    };
                    tracing::debug!(todo_id = %id, %from, to = %next.status(), "Transition allowed");

                    repository.save(next).widen().map(move |saved| {
                        uow.enqueue(event_for(saved.id().clone(), clock.as_ref()));
                        TodoDto::from(&saved)
                    })
                })
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_minimal_input() {
        let new_todo = validate(&CreateTodoInput::new("  Test ")).unwrap();

        assert_eq!(new_todo.title.as_str(), "Test");
        assert_eq!(new_todo.description, None);
        assert_eq!(new_todo.priority, Priority::Medium);
    }

    #[test]
    fn test_validate_reports_every_failing_field() {
        let input = CreateTodoInput::new("")
            .with_description("x".repeat(501))
            .with_priority("Urgent");

        let Err(CommandError::Validation { errors }) = validate(&input) else {
            unreachable!("all three fields are invalid")
        };

        assert_eq!(
            errors,
            vec![
                FieldError::new("title", "Title required"),
                FieldError::new("description", "Description too long"),
                FieldError::new("priority", "Invalid priority"),
            ]
        );
    }

    #[test]
    fn test_input_deserializes_with_missing_fields() {
        let input: CreateTodoInput = serde_json::from_str(r#"{"priority": "High"}"#).unwrap();

        assert_eq!(input.title, "");
        assert_eq!(input.priority.as_deref(), Some("High"));
        assert!(validate(&input).is_err());
    }
}
