//! Composition root.
//!
//! [`App`] wires the in-memory repository, the event bus, the clock and the
//! handlers together once, and runs commands inside a fresh unit of work that
//! is committed only when the command succeeds.

use crate::application::{
    CommandError, FilteredTodos, TodoCommands, TodoFilter, TodoQueries, UnitOfWork, filter_todos,
};
use crate::config::AppConfig;
use crate::domain::{TodoDto, TodoEvent};
use crate::repository::InMemoryTodoRepository;
use effect_todo_core::environment::{Clock, SystemClock};
use effect_todo_core::event_bus::{EventBus, LocalEventBus, Subscription};
use effect_todo_core::{Effect, Event};
use std::fmt;
use std::sync::Arc;

/// The assembled application.
pub struct App {
    config: AppConfig,
    repository: Arc<InMemoryTodoRepository>,
    bus: Arc<LocalEventBus<TodoEvent>>,
    commands: TodoCommands,
    queries: TodoQueries,
    event_log: Option<Subscription>,
}

impl App {
    /// Build the application on the system clock.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build the application on the given clock.
    #[must_use]
    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let repository = Arc::new(InMemoryTodoRepository::new());
        let bus = Arc::new(LocalEventBus::new());
        let commands = TodoCommands::new(repository.clone(), clock);
        let queries = TodoQueries::new(repository.clone());

        let event_log = config.observability.log_events.then(|| {
            bus.subscribe(Box::new(|event: &TodoEvent| {
                tracing::info!(
                    event_type = event.event_type(),
                    todo_id = %event.todo_id(),
                    at = %event.at().to_iso(),
                    "Event published"
                );
            }))
        });

        tracing::debug!(environment = %config.environment, "App assembled");

        Self {
            config,
            repository,
            bus,
            commands,
            queries,
            event_log,
        }
    }

    /// The configuration the app was built with.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Command handlers, for callers managing their own unit of work.
    #[must_use]
    pub const fn commands(&self) -> &TodoCommands {
        &self.commands
    }

    /// Query handlers.
    #[must_use]
    pub const fn queries(&self) -> &TodoQueries {
        &self.queries
    }

    /// Shared handle to the backing store.
    #[must_use]
    pub fn repository(&self) -> Arc<InMemoryTodoRepository> {
        Arc::clone(&self.repository)
    }

    /// A fresh unit of work bound to the app's bus.
    #[must_use]
    pub fn unit_of_work(&self) -> Arc<UnitOfWork> {
        Arc::new(UnitOfWork::new(self.bus.clone()))
    }

    /// Register an event subscriber.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&TodoEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(Box::new(handler))
    }

    /// Run a command in its own unit of work.
    ///
    /// Queued events are published only if the command succeeds.
    ///
    /// # Errors
    ///
    /// Returns the command's [`CommandError`] unchanged.
    pub async fn execute<T, F>(&self, command: F) -> Result<T, CommandError>
    where
        T: Send + 'static,
        F: FnOnce(&TodoCommands, &Arc<UnitOfWork>) -> Effect<T, CommandError>,
    {
        let uow = self.unit_of_work();
        let result = command(&self.commands, &uow).run().await;

        match &result {
            Ok(_) => {
                uow.commit();
            },
            Err(error) => {
                tracing::warn!(
                    %error,
                    status = error.kind().status_code(),
                    discarded = uow.len(),
                    "Command failed"
                );
            },
        }
        result
    }

    /// List todos, honouring `query.exclude_archived`.
    pub async fn list(&self) -> Vec<TodoDto> {
        self.queries
            .get_all(self.config.query.exclude_archived)
            .value()
            .await
    }

    /// List todos and apply a view filter.
    pub async fn list_filtered(&self, filter: TodoFilter) -> FilteredTodos {
        filter_todos(self.list().await, filter)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("repository", &self.repository)
            .field("bus", &self.bus)
            .field("event_log", &self.event_log.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::CreateTodoInput;
    use crate::domain::TodoEventKind;
    use effect_todo_testing::stepping_clock;
    use std::sync::Mutex;

    fn app(log_events: bool) -> App {
        let mut config = AppConfig::default();
        config.observability.log_events = log_events;
        App::with_clock(config, Arc::new(stepping_clock()))
    }

    fn record(app: &App) -> Arc<Mutex<Vec<TodoEventKind>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        app.subscribe(move |event| sink.lock().unwrap().push(event.kind()));
        seen
    }

    #[tokio::test]
    async fn test_execute_commits_on_success() {
        let app = app(false);
        let seen = record(&app);

        let dto = app
            .execute(|commands, uow| commands.create(uow, CreateTodoInput::new("Test")))
            .await
            .unwrap();
        app.execute(|commands, uow| commands.complete(uow, &dto.id))
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![TodoEventKind::Created, TodoEventKind::Completed]
        );
    }

    #[tokio::test]
    async fn test_execute_publishes_nothing_on_failure() {
        let app = app(false);
        let seen = record(&app);

        let error = app
            .execute(|commands, uow| commands.reopen(uow, "todo-missing-1"))
            .await
            .unwrap_err();

        assert_eq!(error, CommandError::NotFound);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_event_log_subscriber_is_registered_when_enabled() {
        assert_eq!(app(true).bus.subscriber_count(), 1);
        assert_eq!(app(false).bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_list_respects_config() {
        let mut config = AppConfig::default();
        config.query.exclude_archived = true;
        let app = App::with_clock(config, Arc::new(stepping_clock()));

        let kept = app
            .execute(|commands, uow| commands.create(uow, CreateTodoInput::new("Kept")))
            .await
            .unwrap();
        let gone = app
            .execute(|commands, uow| commands.create(uow, CreateTodoInput::new("Gone")))
            .await
            .unwrap();
        app.execute(|commands, uow| commands.archive(uow, &gone.id))
            .await
            .unwrap();

        assert_eq!(app.list().await, vec![kept]);
        assert_eq!(app.repository().len(), 2);
    }
}
