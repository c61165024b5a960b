//! Command-line demo for the todolists state core.
//!
//! Loads configuration, builds a store (remote-backed or seeded), runs the
//! Groceries scenario, and prints the board.

use anyhow::Context;
use std::time::Duration;
use todolists::{
    store_from_config, AppState, Config, FilterValue, TaskStatus, TodoAction, TodoStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REQUEST_WAIT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    todolists_runtime::metrics::describe_store_metrics();

    let store = store_from_config(&config).context("failed to build the store")?;

    if config.is_remote() {
        println!("=== Todolists (remote) ===\n");
        dispatch(&store, TodoAction::FetchLists).await?;
    } else {
        println!("=== Todolists (local) ===\n");
    }
    print_board(&store.snapshot().await);

    println!("\nRunning the Groceries scenario...");
    groceries(&store, config.is_remote()).await?;
    print_board(&store.snapshot().await);

    if let Some(error) = store.state(|s| s.app.error.clone()).await {
        println!("\nLast error: {error}");
    }

    store
        .shutdown_gracefully()
        .await
        .context("effects still running at shutdown")?;
    Ok(())
}

/// Send an action and wait for every effect it started
async fn dispatch(store: &TodoStore, action: TodoAction) -> anyhow::Result<()> {
    let name = action.name();
    let mut handle = store.send(action).await?;
    handle
        .wait_with_timeout(REQUEST_WAIT)
        .await
        .with_context(|| format!("{name} did not settle"))?;
    Ok(())
}

async fn groceries(store: &TodoStore, remote: bool) -> anyhow::Result<()> {
    let title = "Groceries".to_string();
    let add_list = if remote {
        TodoAction::CreateList { title }
    } else {
        TodoAction::AddList { title }
    };
    dispatch(store, add_list).await?;

    let Some(list_id) = store
        .state(|s| s.lists.lists.iter().find(|l| l.title == "Groceries").map(|l| l.id.clone()))
        .await
    else {
        anyhow::bail!("Groceries list was not created");
    };

    let title = "Milk".to_string();
    let add_task = if remote {
        TodoAction::CreateTask {
            list_id: list_id.clone(),
            title,
        }
    } else {
        TodoAction::AddTask {
            list_id: list_id.clone(),
            title,
        }
    };
    dispatch(store, add_task).await?;

    let Some(task_id) = store
        .state(|s| s.tasks.bucket(&list_id).and_then(|b| b.first()).map(|t| t.id.clone()))
        .await
    else {
        anyhow::bail!("Milk was not added");
    };

    let done = if remote {
        TodoAction::UpdateTaskStatus {
            list_id: list_id.clone(),
            task_id,
            status: TaskStatus::Completed,
        }
    } else {
        TodoAction::SetTaskStatus {
            list_id: list_id.clone(),
            task_id,
            status: TaskStatus::Completed,
        }
    };
    dispatch(store, done).await?;

    dispatch(
        store,
        TodoAction::SetFilter {
            list_id,
            filter: FilterValue::Completed,
        },
    )
    .await
}

fn print_board(state: &AppState) {
    for list in &state.lists.lists {
        println!(
            "\n{} [{:?}] {}/{} done",
            list.title,
            list.filter,
            state.tasks.completed_count(&list.id),
            state.tasks.count(&list.id)
        );
        for task in state.visible_tasks(&list.id) {
            let mark = if task.is_done() { "✓" } else { " " };
            println!("  [{mark}] {}", task.title);
        }
    }
}
