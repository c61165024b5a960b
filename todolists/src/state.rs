//! The whole snapshot: lists, task buckets, and app status

use crate::lists::ListsState;
use crate::status::StatusState;
use crate::tasks::TasksState;
use crate::types::{ListId, Task, TaskId, TaskStatus, TodoList};
use todolists_core::environment::IdGenerator;

/// Everything an observer can see, replaced atomically per dispatch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// The lists
    pub lists: ListsState,
    /// The task buckets
    pub tasks: TasksState,
    /// Global request state
    pub app: StatusState,
}

impl AppState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The example board used when no remote service is configured
    #[must_use]
    pub fn seeded(ids: &dyn IdGenerator) -> Self {
        let mut state = Self::new();
        state.seed_list(
            ids,
            "What to learn",
            &[
                ("HTML&CSS", true),
                ("JS", true),
                ("ReactJS", false),
                ("RestApi", false),
                ("GraphQL", false),
            ],
        );
        state.seed_list(ids, "What to buy", &[("Bread", true), ("Beer", false), ("Cheese", false)]);
        state.app.is_initialized = true;
        state
    }

    fn seed_list(&mut self, ids: &dyn IdGenerator, title: &str, tasks: &[(&str, bool)]) {
        let list_id = ListId::new(ids.next_id());
        let bucket = tasks
            .iter()
            .map(|&(title, done)| {
                Task::new(TaskId::new(ids.next_id()), list_id.clone(), title)
                    .with_status(TaskStatus::from(done))
            })
            .collect();
        self.lists.lists.push(TodoList::new(list_id.clone(), title));
        self.tasks.buckets.insert(list_id, bucket);
    }

    /// Tasks of a list through that list's own filter
    #[must_use]
    pub fn visible_tasks(&self, list_id: &ListId) -> Vec<&Task> {
        self.lists
            .get(list_id)
            .map(|list| self.tasks.visible(list_id, list.filter))
            .unwrap_or_default()
    }

    /// Whether every list has exactly one bucket and every bucket a list
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.lists.len() == self.tasks.buckets.len()
            && self.lists.ids().all(|id| self.tasks.has_bucket(id))
    }
}
