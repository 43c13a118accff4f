//! Persistence contract for todos and its in-memory implementation.
//!
//! Reads and writes are modelled as effects that cannot fail: the store is a
//! single-process map with no durability, so there is nothing to recover from.

use crate::domain::{Todo, TodoId};
use effect_todo_core::Effect;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Repository trait for todo persistence.
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// by every handler through `Arc<dyn TodoRepository>`.
pub trait TodoRepository: Send + Sync {
    /// Look up a todo by identifier.
    fn find_by_id(&self, id: &TodoId) -> Effect<Option<Todo>, Infallible>;

    /// Every stored todo, in the store's iteration order.
    fn find_all(&self) -> Effect<Vec<Todo>, Infallible>;

    /// Insert or replace the todo with the same identifier.
    fn save(&self, todo: Todo) -> Effect<Todo, Infallible>;
}

#[derive(Debug, Default)]
struct Store {
    todos: Vec<Todo>,
    index: HashMap<TodoId, usize>,
}

impl Store {
    fn upsert(&mut self, todo: Todo) {
        if let Some(&position) = self.index.get(todo.id()) {
            self.todos[position] = todo;
        } else {
            self.index.insert(todo.id().clone(), self.todos.len());
            self.todos.push(todo);
        }
    }
}

/// In-memory repository.
///
/// Iteration order is first-insertion order; replacing a todo keeps its slot.
/// Cloning yields another handle to the same store.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTodoRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .todos
            .len()
    }

    /// Check if the repository is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for InMemoryTodoRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTodoRepository")
            .field("len", &self.len())
            .finish()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn find_by_id(&self, id: &TodoId) -> Effect<Option<Todo>, Infallible> {
        let store = Arc::clone(&self.store);
        let id = id.clone();
        Effect::from_fn(move || {
            let store = store.read().unwrap_or_else(PoisonError::into_inner);
            Ok(store
                .index
                .get(&id)
                .and_then(|&position| store.todos.get(position))
                .cloned())
        })
    }

    fn find_all(&self) -> Effect<Vec<Todo>, Infallible> {
        let store = Arc::clone(&self.store);
        Effect::from_fn(move || {
            Ok(store
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .todos
                .clone())
        })
    }

    fn save(&self, todo: Todo) -> Effect<Todo, Infallible> {
        let store = Arc::clone(&self.store);
        Effect::from_fn(move || {
            tracing::trace!(todo_id = %todo.id(), status = %todo.status(), "Saving todo");
            store
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .upsert(todo.clone());
            Ok(todo)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TodoTitle, complete, create};
    use effect_todo_testing::test_clock;

    fn todo(title: &str) -> Todo {
        let clock = test_clock();
        create(
            TodoId::generate(&clock),
            TodoTitle::create(title).unwrap(),
            None,
            Priority::Medium,
            &clock,
        )
        .into()
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let repository = InMemoryTodoRepository::new();
        let saved = repository.save(todo("Test")).value().await;

        let found = repository.find_by_id(saved.id()).value().await;

        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_missing_is_none() {
        let repository = InMemoryTodoRepository::new();
        let id = TodoId::parse("todo-nonexistent-abc").unwrap();

        assert_eq!(repository.find_by_id(&id).value().await, None);
    }

    #[tokio::test]
    async fn test_save_is_upsert_preserving_order() {
        let repository = InMemoryTodoRepository::new();
        let first = repository.save(todo("First")).value().await;
        let second = repository.save(todo("Second")).value().await;

        let Todo::Active(active) = first.clone() else {
            unreachable!("freshly created todos are active")
        };
        let completed: Todo = complete(active, &test_clock()).into();
        repository.save(completed.clone()).value().await;

        let all = repository.find_all().value().await;
        assert_eq!(all, vec![completed, second]);
        assert_eq!(repository.len(), 2);
    }

    #[tokio::test]
    async fn test_reads_are_deferred_until_run() {
        let repository = InMemoryTodoRepository::new();
        let pending = repository.find_all();
        repository.save(todo("Late")).value().await;

        assert_eq!(pending.value().await.len(), 1);
    }
}
