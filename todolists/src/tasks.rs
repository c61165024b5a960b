//! Task store: one ordered bucket of tasks per list

use crate::action::{RequestTarget, TodoAction};
use crate::environment::TodoEnvironment;
use crate::types::{FilterValue, ListId, RequestStatus, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use todolists_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Tasks grouped by owning list, newest first within a bucket
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksState {
    /// Buckets keyed by list id
    pub buckets: HashMap<ListId, Vec<Task>>,
}

impl TasksState {
    /// Returns a list's bucket
    #[must_use]
    pub fn bucket(&self, list_id: &ListId) -> Option<&[Task]> {
        self.buckets.get(list_id).map(Vec::as_slice)
    }

    /// Checks if a bucket exists for the list
    #[must_use]
    pub fn has_bucket(&self, list_id: &ListId) -> bool {
        self.buckets.contains_key(list_id)
    }

    /// Returns a task by id
    #[must_use]
    pub fn task(&self, list_id: &ListId, task_id: &TaskId) -> Option<&Task> {
        self.bucket(list_id)?.iter().find(|t| &t.id == task_id)
    }

    /// Number of tasks in a list
    #[must_use]
    pub fn count(&self, list_id: &ListId) -> usize {
        self.bucket(list_id).map_or(0, <[Task]>::len)
    }

    /// Number of completed tasks in a list
    #[must_use]
    pub fn completed_count(&self, list_id: &ListId) -> usize {
        self.bucket(list_id)
            .map_or(0, |tasks| tasks.iter().filter(|t| t.is_done()).count())
    }

    /// Tasks of a list that pass `filter`, in bucket order
    ///
    /// Never mutates the bucket; `All` returns every task.
    #[must_use]
    pub fn visible(&self, list_id: &ListId, filter: FilterValue) -> Vec<&Task> {
        self.bucket(list_id)
            .unwrap_or_default()
            .iter()
            .filter(|t| filter.admits(t))
            .collect()
    }

    /// Ensure an empty bucket exists; keeps existing tasks
    pub fn create_bucket(&mut self, list_id: ListId) {
        self.buckets.entry(list_id).or_default();
    }

    /// Remove a bucket and its tasks
    pub fn delete_bucket(&mut self, list_id: &ListId) {
        self.buckets.remove(list_id);
    }

    /// Replace a bucket wholesale; every task starts idle
    ///
    /// A repeated task id keeps its first occurrence.
    pub fn replace_bucket(&mut self, list_id: ListId, tasks: impl IntoIterator<Item = Task>) {
        let mut seen = HashSet::new();
        let tasks = tasks
            .into_iter()
            .filter(|task| seen.insert(task.id.clone()))
            .map(|mut task| {
                task.entity_status = RequestStatus::Idle;
                task
            })
            .collect();
        self.buckets.insert(list_id, tasks);
    }

    fn insert_head(&mut self, task: Task) {
        if let Some(bucket) = self.buckets.get_mut(&task.list_id) {
            if bucket.iter().all(|t| t.id != task.id) {
                bucket.insert(0, task);
            }
        }
    }

    fn remove_task(&mut self, list_id: &ListId, task_id: &TaskId) {
        if let Some(bucket) = self.buckets.get_mut(list_id) {
            bucket.retain(|t| &t.id != task_id);
        }
    }

    fn update(&mut self, list_id: &ListId, task_id: &TaskId, f: impl FnOnce(&mut Task)) {
        if let Some(task) = self
            .buckets
            .get_mut(list_id)
            .and_then(|bucket| bucket.iter_mut().find(|t| &t.id == task_id))
        {
            f(task);
        }
    }
}

/// Applies task-level transitions, including the bucket side of list
/// creation and removal
#[derive(Clone, Copy, Debug, Default)]
pub struct TasksReducer;

impl Reducer for TasksReducer {
    type State = TasksState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Bucket lifecycle follows the list lifecycle
            TodoAction::ListAdded { list_id, .. } => state.create_bucket(list_id),
            TodoAction::ListCreated { list } => state.create_bucket(list.id),
            TodoAction::RemoveList { list_id } | TodoAction::ListDeleted { list_id } => {
                state.delete_bucket(&list_id);
            },
            TodoAction::ListsFetched { lists } => {
                state.buckets = lists
                    .into_iter()
                    .map(|list| (list.id, Vec::new()))
                    .collect();
            },

            TodoAction::TaskAdded {
                list_id,
                task_id,
                title,
            } => {
                let added = env.clock.now().naive_utc();
                state.insert_head(Task::new(task_id, list_id, title).added_at(added));
            },
            TodoAction::TaskCreated { task } => state.insert_head(task.into()),
            TodoAction::TasksFetched { list_id, tasks } => {
                state.replace_bucket(list_id, tasks.into_iter().map(Task::from));
            },
            TodoAction::RemoveTask { list_id, task_id } | TodoAction::TaskDeleted { list_id, task_id } => {
                state.remove_task(&list_id, &task_id);
            },
            TodoAction::SetTaskStatus {
                list_id,
                task_id,
                status,
            } => state.update(&list_id, &task_id, |task| task.status = status),
            TodoAction::SetTaskTitle {
                list_id,
                task_id,
                title,
            } => state.update(&list_id, &task_id, |task| task.title = title),
            TodoAction::SetTaskEntityStatus {
                list_id,
                task_id,
                status,
            } => state.update(&list_id, &task_id, |task| task.entity_status = status),
            TodoAction::TaskUpdated {
                list_id,
                task_id,
                model,
            } => state.update(&list_id, &task_id, |task| {
                model.apply_to(task);
                task.entity_status = RequestStatus::Succeeded;
            }),

            // In-flight flags for per-task requests
            TodoAction::DeleteTask { list_id, task_id }
            | TodoAction::UpdateTaskStatus { list_id, task_id, .. }
            | TodoAction::UpdateTaskTitle { list_id, task_id, .. } => {
                state.update(&list_id, &task_id, |task| task.entity_status = RequestStatus::Loading);
            },
            TodoAction::RequestFailed {
                target: RequestTarget::Task { list_id, task_id },
                ..
            } => state.update(&list_id, &task_id, |task| task.entity_status = RequestStatus::Failed),
            _ => {},
        }
        SmallVec::new()
    }
}
