//! Flat, serialization-ready views of a [`Todo`].

use super::todo::{Todo, TodoStatus};
use super::values::Priority;
use serde::{Deserialize, Serialize};

/// Boundary projection of a todo.
///
/// State-specific timestamps are present only for the matching status and
/// are omitted from the JSON otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    /// Identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Description, when one was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority
    pub priority: Priority,
    /// Current state
    pub status: TodoStatus,
    /// ISO-8601 creation time
    pub created_at: String,
    /// ISO-8601 completion time, only for `Completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// ISO-8601 archive time, only for `Archived`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<String>,
}

impl From<&Todo> for TodoDto {
    fn from(todo: &Todo) -> Self {
        let base = todo.base();
        let (completed_at, archived_at) = match todo {
            Todo::Active(_) => (None, None),
            Todo::Completed(completed) => (Some(completed.completed_at().to_iso()), None),
            Todo::Archived(archived) => (None, Some(archived.archived_at().to_iso())),
        };

        Self {
            id: base.id().to_string(),
            title: base.title().to_string(),
            description: base.description().map(|d| d.as_str().to_string()),
            priority: base.priority(),
            status: todo.status(),
            created_at: base.created_at().to_iso(),
            completed_at,
            archived_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::todo::{archive, complete, create};
    use crate::domain::values::{TodoDescription, TodoId, TodoTitle};
    use effect_todo_testing::test_clock;

    #[test]
    fn test_active_projection_has_no_state_timestamps() {
        let clock = test_clock();
        let todo = create(
            TodoId::parse("todo-1-abc").unwrap(),
            TodoTitle::create("Test").unwrap(),
            None,
            Priority::High,
            &clock,
        );

        let json = serde_json::to_value(TodoDto::from(&Todo::from(todo))).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "todo-1-abc",
                "title": "Test",
                "priority": "High",
                "status": "Active",
                "createdAt": "2025-01-01T00:00:00.000Z",
            })
        );
    }

    #[test]
    fn test_completed_and_archived_projections() {
        let clock = test_clock();
        let active = create(
            TodoId::generate(&clock),
            TodoTitle::create("Test").unwrap(),
            TodoDescription::create(Some("details")).unwrap(),
            Priority::Low,
            &clock,
        );

        let completed = complete(active, &clock);
        let dto = TodoDto::from(&Todo::from(completed.clone()));
        assert_eq!(dto.status, TodoStatus::Completed);
        assert_eq!(dto.description.as_deref(), Some("details"));
        assert!(dto.completed_at.is_some());
        assert!(dto.archived_at.is_none());

        let dto = TodoDto::from(&Todo::from(archive(completed, &clock)));
        assert_eq!(dto.status, TodoStatus::Archived);
        assert!(dto.completed_at.is_none());
        assert_eq!(dto.archived_at.as_deref(), Some("2025-01-01T00:00:00.000Z"));
    }
}
