//! # Todolists
//!
//! State core of a to-do list manager: named lists, per-list task buckets,
//! completion filters, and optional mirroring to a remote service.
//!
//! ## Layout
//!
//! - [`types`]: entity model
//! - [`lists`], [`tasks`], [`status`]: one slice and one reducer each
//! - [`reducer`]: the root [`TodoReducer`], which validates, resolves ids,
//!   issues remote requests, and runs the slice reducers together
//! - [`api`]: the remote service contract, its HTTP client and an in-memory mock
//! - [`config`]: environment-driven configuration
//!
//! ## Example
//!
//! ```no_run
//! use todolists::{AppState, TodoAction, TodoEnvironment, TodoReducer};
//! use todolists_runtime::Store;
//!
//! # async fn demo() -> Result<(), todolists_runtime::StoreError> {
//! let store = Store::new(AppState::new(), TodoReducer::new(), TodoEnvironment::offline());
//! store.send(TodoAction::AddList { title: "Groceries".into() }).await?;
//! assert_eq!(store.state(|s| s.lists.len()).await, 1);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod api;
pub mod config;
pub mod environment;
pub mod error;
pub mod lists;
pub mod reducer;
pub mod state;
pub mod status;
pub mod tasks;
pub mod types;

pub use action::{RequestTarget, TodoAction};
pub use config::Config;
pub use environment::{TodoEnvironment, UuidIds};
pub use error::{ApiError, AppError, TodoError};
pub use reducer::TodoReducer;
pub use state::AppState;
pub use types::{FilterValue, ListId, RequestStatus, Task, TaskId, TaskStatus, TodoList};

use std::sync::Arc;
use todolists_runtime::Store;

/// The store type driving the whole to-do state
pub type TodoStore = Store<AppState, TodoAction, TodoEnvironment, TodoReducer>;

/// Build a store from configuration
///
/// With a remote service configured the store starts empty and uninitialized,
/// waiting for [`TodoAction::FetchLists`]. Without one it starts from the
/// seeded example board.
///
/// # Errors
///
/// Returns [`ApiError::RequestFailed`] if the HTTP client cannot be built.
pub fn store_from_config(config: &Config) -> Result<TodoStore, ApiError> {
    let store_config = config.store.store_config();

    let (state, env) = match api::HttpTodoApi::from_config(&config.api)? {
        Some(api) => {
            tracing::info!(base_url = api.base_url(), "Using remote todo service");
            (AppState::new(), TodoEnvironment::offline().with_api(Arc::new(api)))
        },
        None => {
            tracing::info!("No remote service configured, starting from the example board");
            (AppState::seeded(&UuidIds), TodoEnvironment::offline())
        },
    };

    Ok(Store::with_config(state, TodoReducer::new(), env, store_config))
}
