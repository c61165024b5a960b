//! Root reducer: validation, id resolution, remote requests, and the
//! synchronization of the list, task, and status slices.

use crate::action::{RequestTarget, TodoAction};
use crate::api::{ListRecord, TodoApi, UpdateTaskModel};
use crate::environment::TodoEnvironment;
use crate::error::{ApiError, TodoError};
use crate::lists::{ListsReducer, ListsState};
use crate::state::AppState;
use crate::status::{StatusReducer, StatusState};
use crate::tasks::{TasksReducer, TasksState};
use crate::types::{ListId, TaskId, MAX_TITLE_LEN};
use std::sync::Arc;
use todolists_core::composition::{combine_reducers, scope_reducer, CombinedReducer};
use todolists_core::{async_effect, effect::Effect, reducer::Reducer, SmallVec};

/// Intents rejected before any mutation
pub const INTENTS_REJECTED: &str = "todolists.intents.rejected";
/// Remote requests that were refused or did not complete
pub const REQUESTS_FAILED: &str = "todolists.requests.failed";
/// Outcomes dropped because their entity was removed meanwhile
pub const OUTCOMES_STALE: &str = "todolists.outcomes.stale";

fn lists(state: &mut AppState) -> &mut ListsState {
    &mut state.lists
}

fn tasks(state: &mut AppState) -> &mut TasksState {
    &mut state.tasks
}

fn status(state: &mut AppState) -> &mut StatusState {
    &mut state.app
}

/// Reducer for the whole to-do state
///
/// Every action is checked against the full snapshot first. Intents that
/// fail validation only record the error. Valid actions run through the
/// list, task, and status reducers in one pass, so creating or removing a
/// list creates or removes its bucket in the same dispatch.
pub struct TodoReducer {
    slices: CombinedReducer<AppState, TodoAction, TodoEnvironment>,
}

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub fn new() -> Self {
        Self {
            slices: combine_reducers(vec![
                Box::new(scope_reducer(ListsReducer, lists)),
                Box::new(scope_reducer(TasksReducer, tasks)),
                Box::new(scope_reducer(StatusReducer, status)),
            ]),
        }
    }

    fn validate_title(title: &str) -> Result<(), TodoError> {
        if title.trim().is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        let len = title.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(TodoError::TitleTooLong {
                len,
                max: MAX_TITLE_LEN,
            });
        }
        Ok(())
    }

    fn require_list(state: &AppState, list_id: &ListId) -> Result<(), TodoError> {
        if state.lists.exists(list_id) {
            Ok(())
        } else {
            Err(TodoError::ListNotFound(list_id.clone()))
        }
    }

    fn require_task(state: &AppState, list_id: &ListId, task_id: &TaskId) -> Result<(), TodoError> {
        Self::require_list(state, list_id)?;
        if state.tasks.task(list_id, task_id).is_some() {
            Ok(())
        } else {
            Err(TodoError::TaskNotFound {
                list_id: list_id.clone(),
                task_id: task_id.clone(),
            })
        }
    }

    /// Checks an action against the current snapshot
    fn validate(state: &AppState, action: &TodoAction, env: &TodoEnvironment) -> Result<(), TodoError> {
        if action.is_remote() && !env.is_remote() {
            return Err(TodoError::RemoteUnavailable);
        }

        match action {
            TodoAction::AddList { title } | TodoAction::CreateList { title } => Self::validate_title(title),

            TodoAction::ListAdded { list_id, title } => {
                if state.lists.exists(list_id) {
                    return Err(TodoError::DuplicateList(list_id.clone()));
                }
                Self::validate_title(title)
            },

            TodoAction::RemoveList { list_id }
            | TodoAction::SetFilter { list_id, .. }
            | TodoAction::SetListEntityStatus { list_id, .. }
            | TodoAction::DeleteList { list_id }
            | TodoAction::FetchTasks { list_id } => Self::require_list(state, list_id),

            TodoAction::RenameList { list_id, title }
            | TodoAction::UpdateListTitle { list_id, title }
            | TodoAction::AddTask { list_id, title }
            | TodoAction::CreateTask { list_id, title } => {
                Self::require_list(state, list_id)?;
                Self::validate_title(title)
            },

            TodoAction::TaskAdded {
                list_id,
                task_id,
                title,
            } => {
                Self::require_list(state, list_id)?;
                if state.tasks.task(list_id, task_id).is_some() {
                    return Err(TodoError::DuplicateTask {
                        list_id: list_id.clone(),
                        task_id: task_id.clone(),
                    });
                }
                Self::validate_title(title)
            },

            TodoAction::RemoveTask { list_id, task_id }
            | TodoAction::SetTaskStatus { list_id, task_id, .. }
            | TodoAction::SetTaskEntityStatus { list_id, task_id, .. }
            | TodoAction::DeleteTask { list_id, task_id }
            | TodoAction::UpdateTaskStatus { list_id, task_id, .. } => {
                Self::require_task(state, list_id, task_id)
            },

            TodoAction::SetTaskTitle {
                list_id,
                task_id,
                title,
            }
            | TodoAction::UpdateTaskTitle {
                list_id,
                task_id,
                title,
            } => {
                Self::require_task(state, list_id, task_id)?;
                Self::validate_title(title)
            },

            _ => Ok(()),
        }
    }

    /// Whether a remote outcome refers to an entity removed while in flight,
    /// or creates one that is already present
    fn is_stale(state: &AppState, action: &TodoAction) -> bool {
        match action {
            TodoAction::ListRenamed { list_id, .. } | TodoAction::TasksFetched { list_id, .. } => {
                !state.lists.exists(list_id)
            },
            TodoAction::ListCreated { list } => state.lists.exists(&list.id),
            TodoAction::TaskCreated { task } => {
                !state.lists.exists(&task.todo_list_id)
                    || state.tasks.task(&task.todo_list_id, &task.id).is_some()
            },
            TodoAction::TaskUpdated { list_id, task_id, .. }
            | TodoAction::TaskDeleted { list_id, task_id } => {
                state.tasks.task(list_id, task_id).is_none()
            },
            _ => false,
        }
    }

    /// The request effect of a remote intent
    ///
    /// Built before the slices run so task updates see the task as it is now.
    fn request(state: &AppState, action: &TodoAction, env: &TodoEnvironment) -> Option<Effect<TodoAction>> {
        let api = Arc::clone(env.api.as_ref()?);

        let effect = match action.clone() {
            TodoAction::FetchLists => async_effect! {
                settle(RequestTarget::App, api.get_lists().await, |lists| {
                    TodoAction::ListsFetched { lists }
                })
            },
            TodoAction::CreateList { title } => async_effect! {
                settle(RequestTarget::App, api.create_list(title).await, |list| {
                    TodoAction::ListCreated { list }
                })
            },
            TodoAction::DeleteList { list_id } => async_effect! {
                let target = RequestTarget::List(list_id.clone());
                settle(target, api.delete_list(list_id.clone()).await, |()| {
                    TodoAction::ListDeleted { list_id }
                })
            },
            TodoAction::UpdateListTitle { list_id, title } => async_effect! {
                let result = api.update_list_title(list_id.clone(), title.clone()).await;
                settle(RequestTarget::App, result, |()| TodoAction::ListRenamed { list_id, title })
            },
            TodoAction::FetchTasks { list_id } => fetch_tasks(api, list_id),
            TodoAction::CreateTask { list_id, title } => async_effect! {
                settle(RequestTarget::App, api.create_task(list_id, title).await, |task| {
                    TodoAction::TaskCreated { task }
                })
            },
            TodoAction::DeleteTask { list_id, task_id } => async_effect! {
                let target = RequestTarget::Task {
                    list_id: list_id.clone(),
                    task_id: task_id.clone(),
                };
                settle(target, api.delete_task(list_id.clone(), task_id.clone()).await, |()| {
                    TodoAction::TaskDeleted { list_id, task_id }
                })
            },
            TodoAction::UpdateTaskStatus {
                list_id,
                task_id,
                status,
            } => {
                let mut model = UpdateTaskModel::from(state.tasks.task(&list_id, &task_id)?);
                model.status = status;
                update_task(api, list_id, task_id, model)
            },
            TodoAction::UpdateTaskTitle {
                list_id,
                task_id,
                title,
            } => {
                let mut model = UpdateTaskModel::from(state.tasks.task(&list_id, &task_id)?);
                model.title = title;
                update_task(api, list_id, task_id, model)
            },
            _ => return None,
        };

        Some(effect)
    }

    /// Load every bucket of a freshly fetched set of lists, one request each
    fn fetch_all_tasks(lists: &[ListRecord], env: &TodoEnvironment) -> Option<Effect<TodoAction>> {
        let api = env.api.as_ref()?;
        let effect = Effect::merge(
            lists
                .iter()
                .map(|list| fetch_tasks(Arc::clone(api), list.id.clone()))
                .collect(),
        );
        (!effect.is_none()).then_some(effect)
    }
}

fn fetch_tasks(api: Arc<dyn TodoApi>, list_id: ListId) -> Effect<TodoAction> {
    async_effect! {
        settle(RequestTarget::App, api.get_tasks(list_id.clone()).await, |tasks| {
            TodoAction::TasksFetched { list_id, tasks }
        })
    }
}

/// Send the full update model; on success the same model is applied locally
fn update_task(
    api: Arc<dyn TodoApi>,
    list_id: ListId,
    task_id: TaskId,
    model: UpdateTaskModel,
) -> Effect<TodoAction> {
    async_effect! {
        let target = RequestTarget::Task {
            list_id: list_id.clone(),
            task_id: task_id.clone(),
        };
        let result = api.update_task(list_id.clone(), task_id.clone(), model.clone()).await;
        settle(target, result, |()| TodoAction::TaskUpdated {
            list_id,
            task_id,
            model,
        })
    }
}

/// Resolve a request into its single outcome action
#[allow(clippy::unnecessary_wraps)] // Effects resolve to Option<Action>
fn settle<T>(
    target: RequestTarget,
    result: Result<T, ApiError>,
    on_success: impl FnOnce(T) -> TodoAction,
) -> Option<TodoAction> {
    Some(match result {
        Ok(value) => on_success(value),
        Err(error) => TodoAction::RequestFailed {
            target,
            error: error.into(),
        },
    })
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = AppState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::debug!(action = action.name(), "Reducing action");

        if let Err(error) = Self::validate(state, &action, env) {
            tracing::warn!(action = action.name(), %error, "Rejected intent");
            metrics::counter!(INTENTS_REJECTED).increment(1);
            return self.slices.reduce(state, TodoAction::ValidationFailed { error }, env);
        }

        if Self::is_stale(state, &action) {
            tracing::warn!(action = action.name(), "Dropping outcome for a removed entity");
            metrics::counter!(OUTCOMES_STALE).increment(1);
            return StatusReducer.reduce(&mut state.app, action, env);
        }

        match action {
            TodoAction::AddList { title } => {
                let list_id = ListId::new(env.ids.next_id());
                tracing::debug!(%list_id, "Resolved list id");
                self.slices.reduce(state, TodoAction::ListAdded { list_id, title }, env)
            },
            TodoAction::AddTask { list_id, title } => {
                let task_id = TaskId::new(env.ids.next_id());
                tracing::debug!(%list_id, %task_id, "Resolved task id");
                let resolved = TodoAction::TaskAdded {
                    list_id,
                    task_id,
                    title,
                };
                self.slices.reduce(state, resolved, env)
            },
            TodoAction::ListsFetched { ref lists } => {
                let fetch = Self::fetch_all_tasks(lists, env);
                let mut effects = self.slices.reduce(state, action, env);
                effects.extend(fetch);
                effects
            },
            TodoAction::RequestFailed { ref target, ref error } => {
                tracing::error!(?target, %error, "Remote request failed");
                let kind = if error.is_domain() { "domain" } else { "network" };
                metrics::counter!(REQUESTS_FAILED, "kind" => kind).increment(1);
                self.slices.reduce(state, action, env)
            },
            action if action.is_remote() => {
                let request = Self::request(state, &action, env);
                let mut effects = self.slices.reduce(state, action, env);
                effects.extend(request);
                effects
            },
            action => self.slices.reduce(state, action, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockTodoApi, TaskRecord};
    use crate::error::AppError;
    use crate::types::{FilterValue, RequestStatus, TaskStatus};
    use todolists_testing::{assertions, ReducerTest};

    fn remote_env() -> TodoEnvironment {
        TodoEnvironment::for_tests().with_api(Arc::new(MockTodoApi::new()))
    }

    fn groceries() -> AppState {
        let mut state = AppState::new();
        let _ = TodoReducer::new().reduce(
            &mut state,
            TodoAction::ListAdded {
                list_id: ListId::from("l1"),
                title: "Groceries".to_string(),
            },
            &TodoEnvironment::for_tests(),
        );
        state
    }

    fn l1() -> ListId {
        ListId::from("l1")
    }

    #[test]
    fn add_list_creates_list_and_bucket_with_one_id() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(AppState::new())
            .when_action(TodoAction::AddList {
                title: "Groceries".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.lists.len(), 1);
                let id = &state.lists.lists[0].id;
                assert_eq!(id.as_str(), "id-1");
                assert_eq!(state.tasks.bucket(id), Some(&[][..]));
                assert!(state.is_consistent());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn groceries_scenario() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_actions([
                TodoAction::AddTask {
                    list_id: l1(),
                    title: "Milk".to_string(),
                },
                TodoAction::SetTaskStatus {
                    list_id: l1(),
                    task_id: TaskId::from("id-1"),
                    status: TaskStatus::Completed,
                },
                TodoAction::SetFilter {
                    list_id: l1(),
                    filter: FilterValue::Completed,
                },
            ])
            .then_state(|state| {
                let completed: Vec<_> = state.visible_tasks(&l1()).iter().map(|t| t.title.as_str()).collect();
                assert_eq!(completed, vec!["Milk"]);
                assert!(state.tasks.visible(&l1(), FilterValue::Active).is_empty());
                assert_eq!(state.tasks.count(&l1()), 1);
                assert!(state.app.error.is_none());
            })
            .run();
    }

    #[test]
    fn empty_title_is_rejected_without_mutation() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_action(TodoAction::AddTask {
                list_id: l1(),
                title: "   ".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.tasks.count(&l1()), 0);
                assert_eq!(state.app.error, Some(AppError::Validation(TodoError::EmptyTitle)));
                assert_eq!(state.app.status, RequestStatus::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn long_title_is_rejected() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(AppState::new())
            .when_action(TodoAction::AddList {
                title: "x".repeat(MAX_TITLE_LEN + 1),
            })
            .then_state(|state| {
                assert!(state.lists.is_empty());
                assert!(matches!(
                    state.app.error,
                    Some(AppError::Validation(TodoError::TitleTooLong { len: 101, max: 100 }))
                ));
            })
            .run();
    }

    #[test]
    fn unknown_ids_are_reported() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_action(TodoAction::RemoveTask {
                list_id: l1(),
                task_id: TaskId::from("missing"),
            })
            .then_state(|state| {
                assert!(matches!(
                    state.app.error,
                    Some(AppError::Validation(TodoError::TaskNotFound { .. }))
                ));
                assert!(state.is_consistent());
            })
            .run();

        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_action(TodoAction::RemoveList {
                list_id: ListId::from("missing"),
            })
            .then_state(|state| {
                assert_eq!(state.lists.len(), 1);
                assert_eq!(
                    state.app.error,
                    Some(AppError::Validation(TodoError::ListNotFound(ListId::from("missing"))))
                );
            })
            .run();
    }

    #[test]
    fn remote_intent_without_service_is_rejected() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(AppState::new())
            .when_action(TodoAction::FetchLists)
            .then_state(|state| {
                assert_eq!(state.app.error, Some(AppError::Validation(TodoError::RemoteUnavailable)));
                assert_eq!(state.app.status, RequestStatus::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn remote_intent_returns_request_effect() {
        ReducerTest::new(TodoReducer::new())
            .with_env(remote_env())
            .given_state(groceries())
            .when_action(TodoAction::CreateTask {
                list_id: l1(),
                title: "Milk".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.app.status, RequestStatus::Loading);
                assert_eq!(state.tasks.count(&l1()), 0);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn removing_a_list_cascades_to_its_bucket() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_actions([
                TodoAction::AddTask {
                    list_id: l1(),
                    title: "Milk".to_string(),
                },
                TodoAction::RemoveList { list_id: l1() },
            ])
            .then_state(|state| {
                assert!(state.lists.is_empty());
                assert!(state.tasks.buckets.is_empty());
            })
            .run();
    }

    #[test]
    fn stale_task_outcome_is_dropped() {
        let orphan = TaskRecord {
            id: TaskId::from("t1"),
            todo_list_id: ListId::from("gone"),
            title: "Milk".to_string(),
            description: None,
            status: TaskStatus::New,
            priority: crate::types::TaskPriority::Low,
            start_date: None,
            deadline: None,
            added_date: None,
            order: 0,
        };

        ReducerTest::new(TodoReducer::new())
            .with_env(remote_env())
            .given_state(groceries())
            .when_action(TodoAction::TaskCreated { task: orphan })
            .then_state(|state| {
                assert!(state.is_consistent());
                assert!(!state.tasks.has_bucket(&ListId::from("gone")));
                assert!(state.app.error.is_none());
                assert_eq!(state.app.status, RequestStatus::Succeeded);
            })
            .run();
    }

    fn list_record(id: &str, title: &str) -> ListRecord {
        ListRecord {
            id: ListId::from(id),
            title: title.to_string(),
            added_date: None,
            order: 0,
        }
    }

    fn task_record(id: &str) -> TaskRecord {
        TaskRecord {
            id: TaskId::from(id),
            todo_list_id: l1(),
            title: "Milk".to_string(),
            description: None,
            status: TaskStatus::New,
            priority: crate::types::TaskPriority::Low,
            start_date: None,
            deadline: None,
            added_date: None,
            order: 0,
        }
    }

    #[test]
    fn list_added_with_existing_id_is_rejected() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_action(TodoAction::ListAdded {
                list_id: l1(),
                title: "Hardware".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.lists.len(), 1);
                assert_eq!(state.lists.lists[0].title, "Groceries");
                assert!(state.is_consistent());
                assert_eq!(
                    state.app.error,
                    Some(AppError::Validation(TodoError::DuplicateList(l1())))
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn task_added_with_existing_id_is_rejected() {
        let added = TodoAction::TaskAdded {
            list_id: l1(),
            task_id: TaskId::from("t1"),
            title: "Milk".to_string(),
        };

        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_actions([added.clone(), added])
            .then_state(|state| {
                assert_eq!(state.tasks.count(&l1()), 1);
                assert!(matches!(
                    state.app.error,
                    Some(AppError::Validation(TodoError::DuplicateTask { .. }))
                ));
            })
            .run();
    }

    #[test]
    fn one_remove_after_repeated_adds_empties_the_bucket_once() {
        let added = TodoAction::TaskAdded {
            list_id: l1(),
            task_id: TaskId::from("t1"),
            title: "Milk".to_string(),
        };

        ReducerTest::new(TodoReducer::new())
            .with_env(remote_env())
            .given_state(groceries())
            .when_actions([
                added.clone(),
                added,
                TodoAction::TaskCreated { task: task_record("t1") },
                TodoAction::TaskAdded {
                    list_id: l1(),
                    task_id: TaskId::from("t2"),
                    title: "Bread".to_string(),
                },
                TodoAction::RemoveTask {
                    list_id: l1(),
                    task_id: TaskId::from("t1"),
                },
            ])
            .then_state(|state| {
                let titles: Vec<_> = state.tasks.bucket(&l1()).unwrap().iter().map(|t| t.title.as_str()).collect();
                assert_eq!(titles, vec!["Bread"]);
            })
            .run();
    }

    #[test]
    fn repeated_created_outcomes_are_dropped() {
        ReducerTest::new(TodoReducer::new())
            .with_env(remote_env())
            .given_state(groceries())
            .when_actions([
                TodoAction::ListCreated {
                    list: list_record("l1", "Groceries again"),
                },
                TodoAction::TaskCreated { task: task_record("t1") },
                TodoAction::TaskCreated { task: task_record("t1") },
            ])
            .then_state(|state| {
                assert_eq!(state.lists.len(), 1);
                assert_eq!(state.lists.lists[0].title, "Groceries");
                assert_eq!(state.tasks.count(&l1()), 1);
                assert!(state.is_consistent());
                assert!(state.app.error.is_none());
            })
            .run();
    }

    #[test]
    fn fetched_lists_with_repeated_ids_stay_consistent() {
        ReducerTest::new(TodoReducer::new())
            .with_env(TodoEnvironment::for_tests())
            .given_state(groceries())
            .when_action(TodoAction::ListsFetched {
                lists: vec![list_record("a", "A"), list_record("a", "A again")],
            })
            .then_state(|state| {
                assert_eq!(state.lists.len(), 1);
                assert!(state.is_consistent());
                assert!(state.app.is_initialized);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn fetched_lists_load_every_bucket_in_parallel() {
        ReducerTest::new(TodoReducer::new())
            .with_env(remote_env())
            .given_state(AppState::new())
            .when_action(TodoAction::ListsFetched {
                lists: vec![list_record("a", "A"), list_record("b", "B")],
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert!(matches!(&effects[0], Effect::Parallel(fetches) if fetches.len() == 2));
            })
            .run();
    }

    #[test]
    fn domain_failure_surfaces_server_message() {
        ReducerTest::new(TodoReducer::new())
            .with_env(remote_env())
            .given_state(groceries())
            .when_action(TodoAction::RequestFailed {
                target: RequestTarget::App,
                error: AppError::Domain {
                    messages: vec!["Title is too long".to_string()],
                },
            })
            .then_state(|state| {
                assert_eq!(state.app.status, RequestStatus::Failed);
                assert_eq!(
                    state.app.error.as_ref().map(ToString::to_string).as_deref(),
                    Some("Title is too long")
                );
                assert_eq!(state.tasks.count(&l1()), 0);
            })
            .run();
    }
}
