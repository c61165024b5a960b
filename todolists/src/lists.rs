//! List store: the ordered lists and each one's filter

use crate::action::{RequestTarget, TodoAction};
use crate::environment::TodoEnvironment;
use crate::types::{ListId, RequestStatus, TodoList};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use todolists_core::{effect::Effect, reducer::Reducer, SmallVec};

/// The ordered sequence of lists
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListsState {
    /// Lists in display order
    pub lists: Vec<TodoList>,
}

impl ListsState {
    /// Returns a list by id
    #[must_use]
    pub fn get(&self, id: &ListId) -> Option<&TodoList> {
        self.lists.iter().find(|l| &l.id == id)
    }

    fn get_mut(&mut self, id: &ListId) -> Option<&mut TodoList> {
        self.lists.iter_mut().find(|l| &l.id == id)
    }

    /// Checks if a list exists
    #[must_use]
    pub fn exists(&self, id: &ListId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of lists
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether there are no lists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Ids in display order
    pub fn ids(&self) -> impl Iterator<Item = &ListId> {
        self.lists.iter().map(|l| &l.id)
    }

    fn remove(&mut self, id: &ListId) {
        self.lists.retain(|l| &l.id != id);
    }

    fn update(&mut self, id: &ListId, f: impl FnOnce(&mut TodoList)) {
        if let Some(list) = self.get_mut(id) {
            f(list);
        }
    }
}

/// Applies list-level transitions
///
/// Reacts to the same actions as [`TasksReducer`](crate::tasks::TasksReducer)
/// for list creation and removal; combined under one dispatch, the two
/// slices always change together.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListsReducer;

impl Reducer for ListsReducer {
    type State = ListsState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::ListAdded { list_id, title } => {
                if !state.exists(&list_id) {
                    state.lists.push(TodoList::new(list_id, title));
                }
            },
            TodoAction::ListCreated { list } => {
                if !state.exists(&list.id) {
                    state.lists.insert(0, list.into());
                }
            },
            TodoAction::ListsFetched { lists } => {
                // First occurrence of a repeated id wins
                let mut seen = HashSet::new();
                state.lists = lists
                    .into_iter()
                    .filter(|list| seen.insert(list.id.clone()))
                    .map(TodoList::from)
                    .collect();
            },
            TodoAction::RemoveList { list_id } | TodoAction::ListDeleted { list_id } => {
                state.remove(&list_id);
            },
            TodoAction::RenameList { list_id, title } | TodoAction::ListRenamed { list_id, title } => {
                state.update(&list_id, |list| list.title = title);
            },
            TodoAction::SetFilter { list_id, filter } => {
                state.update(&list_id, |list| list.filter = filter);
            },
            TodoAction::SetListEntityStatus { list_id, status } => {
                state.update(&list_id, |list| list.entity_status = status);
            },
            TodoAction::DeleteList { list_id } => {
                state.update(&list_id, |list| list.entity_status = RequestStatus::Loading);
            },
            TodoAction::RequestFailed {
                target: RequestTarget::List(list_id),
                ..
            } => {
                state.update(&list_id, |list| list.entity_status = RequestStatus::Failed);
            },
            _ => {},
        }
        SmallVec::new()
    }
}
