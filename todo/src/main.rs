//! CLI demo walking a todo through its whole lifecycle.
//!
//! Log output is controlled by `RUST_LOG`, falling back to the configured
//! level (`TODO_LOG_LEVEL`, or the environment default).

use anyhow::Context;
use effect_todo::{App, AppConfig, CreateTodoInput, TodoDto, TodoFilter, TodoStatus};
use tracing_subscriber::EnvFilter;

fn print_todos(heading: &str, todos: &[TodoDto]) {
    println!("\n{heading}");
    for todo in todos {
        let mark = match todo.status {
            TodoStatus::Active => " ",
            TodoStatus::Completed => "✓",
            TodoStatus::Archived => "-",
        };
        println!("  [{mark}] {} ({})", todo.title, todo.priority.as_str());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Effect Todo ===");
    let app = App::new(config);

    println!("\nCreating todos...");
    let milk = app
        .execute(|commands, uow| {
            commands.create(uow, CreateTodoInput::new("Buy milk").with_priority("High"))
        })
        .await?;
    let docs = app
        .execute(|commands, uow| {
            commands.create(
                uow,
                CreateTodoInput::new("Write documentation")
                    .with_description("Cover the lifecycle and the unit of work"),
            )
        })
        .await?;
    let deploy = app
        .execute(|commands, uow| {
            commands.create(
                uow,
                CreateTodoInput::new("Deploy to production").with_priority("Low"),
            )
        })
        .await?;
    print_todos("Todos created:", &app.list().await);

    println!("\nCompleting 'Buy milk' and 'Write documentation'...");
    app.execute(|commands, uow| commands.complete(uow, &milk.id))
        .await?;
    app.execute(|commands, uow| commands.complete(uow, &docs.id))
        .await?;

    println!("Reopening 'Write documentation'...");
    app.execute(|commands, uow| commands.reopen(uow, &docs.id))
        .await?;

    println!("Archiving 'Deploy to production'...");
    app.execute(|commands, uow| commands.archive(uow, &deploy.id))
        .await?;

    let view = app.list_filtered(TodoFilter::All).await;
    print_todos("Current status:", &view.todos);
    println!(
        "\nActive: {}, completed: {}, total: {}",
        view.counts.active, view.counts.completed, view.counts.all
    );

    println!("\nArchiving it a second time...");
    match app
        .execute(|commands, uow| commands.archive(uow, &deploy.id))
        .await
    {
        Ok(_) => println!("  unexpectedly succeeded"),
        Err(error) => println!(
            "  rejected ({}): {}",
            error.kind().status_code(),
            serde_json::to_string(&error)?
        ),
    }

    println!("\nFinal todos as JSON:");
    println!("{}", serde_json::to_string_pretty(&app.list().await)?);

    println!("\n=== Demo Complete ===");
    Ok(())
}
