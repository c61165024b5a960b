//! Property tests for the synchronization rules of the root reducer

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use todolists::api::{ListRecord, TaskRecord};
use todolists::types::TaskPriority;
use todolists::{
    AppState, FilterValue, ListId, Task, TaskId, TaskStatus, TodoAction, TodoEnvironment, TodoList,
    TodoReducer,
};
use todolists_core::reducer::Reducer;
use todolists_testing::{test_clock, SequentialIds};

fn env() -> TodoEnvironment {
    TodoEnvironment::new(Arc::new(SequentialIds::default()), Arc::new(test_clock()))
}

fn apply(state: &mut AppState, env: &TodoEnvironment, action: TodoAction) {
    let effects = TodoReducer::new().reduce(state, action, env);
    assert!(effects.iter().all(todolists_core::effect::Effect::is_none));
}

#[derive(Clone, Debug)]
enum ListOp {
    Add(String),
    Remove(usize),
    /// Resend an outcome carrying the id of an existing list
    ReplayList(usize),
    /// Resend an outcome carrying the id of an existing task
    ReplayTask(usize),
}

fn list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(ListOp::Add),
        (0usize..8).prop_map(ListOp::Remove),
        (0usize..8).prop_map(ListOp::ReplayList),
        (0usize..8).prop_map(ListOp::ReplayTask),
    ]
}

fn ids_are_unique(state: &AppState) -> bool {
    let lists: HashSet<_> = state.lists.ids().collect();
    lists.len() == state.lists.len()
        && state.tasks.buckets.values().all(|bucket| {
            let ids: HashSet<_> = bucket.iter().map(|t| &t.id).collect();
            ids.len() == bucket.len()
        })
}

fn replayed_list(list: &TodoList) -> [TodoAction; 2] {
    [
        TodoAction::ListAdded {
            list_id: list.id.clone(),
            title: "Replayed".into(),
        },
        TodoAction::ListCreated {
            list: ListRecord {
                id: list.id.clone(),
                title: "Replayed".into(),
                added_date: None,
                order: 0,
            },
        },
    ]
}

fn replayed_task(task: &Task) -> [TodoAction; 2] {
    [
        TodoAction::TaskAdded {
            list_id: task.list_id.clone(),
            task_id: task.id.clone(),
            title: "Replayed".into(),
        },
        TodoAction::TaskCreated {
            task: TaskRecord {
                id: task.id.clone(),
                todo_list_id: task.list_id.clone(),
                title: "Replayed".into(),
                description: None,
                status: TaskStatus::New,
                priority: TaskPriority::Low,
                start_date: None,
                deadline: None,
                added_date: None,
                order: 0,
            },
        },
    ]
}

fn status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::New),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Draft),
    ]
}

/// One list holding a task per status, newest first
fn board(statuses: &[TaskStatus], env: &TodoEnvironment) -> (AppState, ListId) {
    let mut state = AppState::new();
    apply(&mut state, env, TodoAction::AddList { title: "Board".into() });
    let list_id = state.lists.lists[0].id.clone();

    for (n, status) in statuses.iter().enumerate() {
        apply(
            &mut state,
            env,
            TodoAction::AddTask {
                list_id: list_id.clone(),
                title: format!("task {n}"),
            },
        );
        let task_id = state.tasks.bucket(&list_id).unwrap()[0].id.clone();
        apply(
            &mut state,
            env,
            TodoAction::SetTaskStatus {
                list_id: list_id.clone(),
                task_id,
                status: *status,
            },
        );
    }
    (state, list_id)
}

proptest! {
    #[test]
    fn lists_and_buckets_stay_in_step(ops in prop::collection::vec(list_op(), 0..24)) {
        let env = env();
        let mut state = AppState::new();

        for op in ops {
            let actions = match op {
                ListOp::Add(title) => vec![TodoAction::AddList { title }],
                ListOp::Remove(index) => {
                    let list_id = state
                        .lists
                        .lists
                        .get(index)
                        .map_or_else(|| ListId::from("missing"), |l| l.id.clone());
                    vec![TodoAction::RemoveList { list_id }]
                },
                ListOp::ReplayList(index) => state
                    .lists
                    .lists
                    .get(index)
                    .map(|list| replayed_list(list).to_vec())
                    .unwrap_or_default(),
                ListOp::ReplayTask(index) => state
                    .tasks
                    .buckets
                    .values()
                    .flatten()
                    .nth(index)
                    .map(|task| replayed_task(task).to_vec())
                    .unwrap_or_default(),
            };
            for action in actions {
                let lists_before = state.lists.len();
                apply(&mut state, &env, action);
                prop_assert!(state.lists.len() <= lists_before + 1);
                prop_assert!(state.is_consistent());
                prop_assert!(ids_are_unique(&state));
            }

            // Give the newest list a task so task replays have something to collide with
            if let Some(list) = state.lists.lists.last() {
                let add = TodoAction::AddTask { list_id: list.id.clone(), title: "Milk".into() };
                apply(&mut state, &env, add);
                prop_assert!(ids_are_unique(&state));
            }
        }
    }

    #[test]
    fn tasks_added_to_existing_lists_keep_unique_ids(titles in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let env = env();
        let mut state = AppState::new();
        apply(&mut state, &env, TodoAction::AddList { title: "Board".into() });
        let list_id = state.lists.lists[0].id.clone();

        for title in titles {
            apply(&mut state, &env, TodoAction::AddTask { list_id: list_id.clone(), title });
            let newest = state.tasks.bucket(&list_id).unwrap()[0].clone();
            for action in replayed_task(&newest) {
                apply(&mut state, &env, action);
            }
            prop_assert!(ids_are_unique(&state));
        }
    }

    #[test]
    fn filtering_never_touches_the_bucket(
        statuses in prop::collection::vec(status(), 0..12),
        filter in prop_oneof![
            Just(FilterValue::All),
            Just(FilterValue::Active),
            Just(FilterValue::Completed),
        ],
    ) {
        let env = env();
        let (mut state, list_id) = board(&statuses, &env);
        let before = state.tasks.clone();

        apply(&mut state, &env, TodoAction::SetFilter { list_id: list_id.clone(), filter });
        prop_assert_eq!(&state.tasks, &before);

        let all: Vec<_> = state.tasks.visible(&list_id, FilterValue::All).into_iter().cloned().collect();
        prop_assert_eq!(all.as_slice(), state.tasks.bucket(&list_id).unwrap());

        let active = state.tasks.visible(&list_id, FilterValue::Active).len();
        let completed = state.tasks.visible(&list_id, FilterValue::Completed).len();
        prop_assert_eq!(active + completed, statuses.len());
        prop_assert_eq!(completed, statuses.iter().filter(|s| **s == TaskStatus::Completed).count());
    }

    #[test]
    fn setting_a_status_twice_changes_nothing(
        statuses in prop::collection::vec(status(), 1..8),
        target in status(),
        pick in any::<prop::sample::Index>(),
    ) {
        let env = env();
        let (mut state, list_id) = board(&statuses, &env);
        let task_id = pick.get(state.tasks.bucket(&list_id).unwrap()).id.clone();
        let action = TodoAction::SetTaskStatus { list_id, task_id, status: target };

        apply(&mut state, &env, action.clone());
        let once = state.clone();
        apply(&mut state, &env, action);
        prop_assert_eq!(state, once);
    }

    #[test]
    fn adding_then_removing_a_task_restores_the_state(
        statuses in prop::collection::vec(status(), 0..8),
        title in "[a-zA-Z][a-zA-Z ]{0,30}",
    ) {
        let env = env();
        let (mut state, list_id) = board(&statuses, &env);
        let before = state.clone();

        apply(&mut state, &env, TodoAction::AddTask { list_id: list_id.clone(), title: title.clone() });
        let added = state.tasks.bucket(&list_id).unwrap()[0].clone();
        prop_assert_eq!(&added.title, &title);
        prop_assert_eq!(state.tasks.count(&list_id), statuses.len() + 1);

        apply(&mut state, &env, TodoAction::RemoveTask { list_id, task_id: added.id });
        prop_assert_eq!(state, before);
    }
}

#[test]
fn removing_an_unknown_task_is_reported_not_applied() {
    let env = env();
    let (mut state, list_id) = board(&[TaskStatus::New], &env);
    let before = state.tasks.clone();

    apply(
        &mut state,
        &env,
        TodoAction::RemoveTask {
            list_id,
            task_id: TaskId::from("missing"),
        },
    );
    assert_eq!(state.tasks, before);
    assert!(state.app.error.is_some());
}
