//! Read side: listing todos and filtering them for display.

use crate::domain::{TodoDto, TodoStatus};
use crate::repository::TodoRepository;
use effect_todo_core::Effect;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Query handlers over a [`TodoRepository`].
#[derive(Clone)]
pub struct TodoQueries {
    repository: Arc<dyn TodoRepository>,
}

impl fmt::Debug for TodoQueries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoQueries").finish_non_exhaustive()
    }
}

impl TodoQueries {
    /// Create query handlers over `repository`
    #[must_use]
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    /// Every todo, newest first.
    ///
    /// With `exclude_archived`, `Archived` todos are left out. Todos created at
    /// the same instant keep their storage order.
    pub fn get_all(&self, exclude_archived: bool) -> Effect<Vec<TodoDto>, Infallible> {
        self.repository.find_all().map(move |todos| {
            let mut visible: Vec<_> = todos
                .into_iter()
                .filter(|todo| !(exclude_archived && todo.status() == TodoStatus::Archived))
                .collect();
            visible.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

            tracing::debug!(count = visible.len(), exclude_archived, "Listed todos");
            visible.iter().map(TodoDto::from).collect()
        })
    }
}

/// Which todos a list view shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    /// Everything passed in
    #[default]
    All,
    /// Only `Active` todos
    Active,
    /// Only `Completed` todos
    Completed,
}

impl TodoFilter {
    /// Name used in URLs and query strings
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    const fn accepts(self, status: TodoStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => matches!(status, TodoStatus::Active),
            Self::Completed => matches!(status, TodoStatus::Completed),
        }
    }
}

impl fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Unknown filter: {other}")),
        }
    }
}

/// Per-status totals over an unfiltered list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TodoCounts {
    /// Every todo in the list
    pub all: usize,
    /// `Active` todos
    pub active: usize,
    /// `Completed` todos
    pub completed: usize,
}

/// Result of [`filter_todos`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilteredTodos {
    /// The filter that was applied
    pub filter: TodoFilter,
    /// Matching todos, in input order
    pub todos: Vec<TodoDto>,
    /// Totals computed before filtering
    pub counts: TodoCounts,
}

/// Apply a view filter to an already listed set of todos.
#[must_use]
pub fn filter_todos(todos: Vec<TodoDto>, filter: TodoFilter) -> FilteredTodos {
    let counts = todos.iter().fold(
        TodoCounts::default(),
        |mut counts, todo| {
            counts.all += 1;
            match todo.status {
                TodoStatus::Active => counts.active += 1,
                TodoStatus::Completed => counts.completed += 1,
                TodoStatus::Archived => {},
            }
            counts
        },
    );

    FilteredTodos {
        filter,
        todos: todos
            .into_iter()
            .filter(|todo| filter.accepts(todo.status))
            .collect(),
        counts,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{Priority, Todo, TodoId, TodoTitle, archive, complete, create};
    use crate::repository::InMemoryTodoRepository;
    use effect_todo_core::environment::Clock;
    use effect_todo_testing::{stepping_clock, test_clock};

    fn active(title: &str, clock: &dyn Clock) -> crate::domain::ActiveTodo {
        create(
            TodoId::generate(clock),
            TodoTitle::create(title).unwrap(),
            None,
            Priority::Medium,
            clock,
        )
    }

    async fn seeded() -> TodoQueries {
        let clock = stepping_clock();
        let repository = InMemoryTodoRepository::new();
        let first: Todo = active("First", &clock).into();
        let second: Todo = complete(active("Second", &clock), &clock).into();
        let third: Todo = archive(active("Third", &clock), &clock).into();
        for todo in [first, second, third] {
            repository.save(todo).value().await;
        }
        TodoQueries::new(Arc::new(repository))
    }

    fn titles(todos: &[TodoDto]) -> Vec<&str> {
        todos.iter().map(|todo| todo.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_get_all_sorts_newest_first() {
        let queries = seeded().await;

        let todos = queries.get_all(false).value().await;

        assert_eq!(titles(&todos), vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_get_all_can_exclude_archived() {
        let queries = seeded().await;

        let todos = queries.get_all(true).value().await;

        assert_eq!(titles(&todos), vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_get_all_on_empty_repository() {
        let queries = TodoQueries::new(Arc::new(InMemoryTodoRepository::new()));

        assert!(queries.get_all(true).value().await.is_empty());
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_storage_order() {
        let clock = test_clock();
        let repository = InMemoryTodoRepository::new();
        for title in ["A", "B", "C"] {
            repository.save(active(title, &clock).into()).value().await;
        }
        let queries = TodoQueries::new(Arc::new(repository));

        let todos = queries.get_all(false).value().await;

        assert_eq!(titles(&todos), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_filter_counts_ignore_the_filter() {
        let todos = seeded().await.get_all(false).value().await;

        let view = filter_todos(todos, TodoFilter::Active);

        assert_eq!(titles(&view.todos), vec!["First"]);
        assert_eq!(
            view.counts,
            TodoCounts {
                all: 3,
                active: 1,
                completed: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_filter_completed_and_all() {
        let todos = seeded().await.get_all(true).value().await;

        assert_eq!(
            titles(&filter_todos(todos.clone(), TodoFilter::Completed).todos),
            vec!["Second"]
        );
        assert_eq!(filter_todos(todos, TodoFilter::All).todos.len(), 2);
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("active".parse(), Ok(TodoFilter::Active));
        assert_eq!("all".parse(), Ok(TodoFilter::All));
        assert_eq!(TodoFilter::Completed.to_string(), "completed");
        assert!("Active".parse::<TodoFilter>().is_err());
    }
}
