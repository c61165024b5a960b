//! The closed set of operations on the to-do state
//!
//! Intents are what callers send. Outcomes are produced by the reducer
//! itself (ids resolved, validation failed) or fed back by remote effects.

use crate::api::{ListRecord, TaskRecord, UpdateTaskModel};
use crate::error::{AppError, TodoError};
use crate::types::{FilterValue, ListId, RequestStatus, TaskId, TaskStatus};
use todolists_macros::Action;

/// Entity a failed request was about
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestTarget {
    /// A global operation (fetching or creating lists)
    App,
    /// A request about one list
    List(ListId),
    /// A request about one task
    Task {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
    },
}

/// Actions for the to-do state
#[derive(Action, Clone, Debug, PartialEq)]
pub enum TodoAction {
    // ========== Local list intents ==========
    /// Append a new list with a fresh id and an empty bucket
    #[intent]
    AddList {
        /// Display name
        title: String,
    },

    /// Remove a list and its bucket
    #[intent]
    RemoveList {
        /// List to remove
        list_id: ListId,
    },

    /// Rename a list
    #[intent]
    RenameList {
        /// List to rename
        list_id: ListId,
        /// New name
        title: String,
    },

    /// Change which tasks of a list are visible
    #[intent]
    SetFilter {
        /// List to filter
        list_id: ListId,
        /// New filter
        filter: FilterValue,
    },

    /// Set a list's request flag
    #[intent]
    SetListEntityStatus {
        /// The list
        list_id: ListId,
        /// New flag
        status: RequestStatus,
    },

    // ========== Local task intents ==========
    /// Insert a new task with a fresh id at the head of a bucket
    #[intent]
    AddTask {
        /// Owning list
        list_id: ListId,
        /// Display text
        title: String,
    },

    /// Remove a task
    #[intent]
    RemoveTask {
        /// Owning list
        list_id: ListId,
        /// Task to remove
        task_id: TaskId,
    },

    /// Replace a task's completion state
    #[intent]
    SetTaskStatus {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
        /// New state
        status: TaskStatus,
    },

    /// Replace a task's title
    #[intent]
    SetTaskTitle {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
        /// New title
        title: String,
    },

    /// Set a task's request flag
    #[intent]
    SetTaskEntityStatus {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
        /// New flag
        status: RequestStatus,
    },

    // ========== App intents ==========
    /// Clear `app.error`
    #[intent]
    DismissError,

    /// Flip `app.is_initialized`
    #[intent]
    SetInitialized(bool),

    // ========== Remote intents ==========
    /// Load all lists from the service
    #[intent]
    FetchLists,

    /// Create a list on the service
    #[intent]
    CreateList {
        /// Display name
        title: String,
    },

    /// Delete a list on the service
    #[intent]
    DeleteList {
        /// List to delete
        list_id: ListId,
    },

    /// Rename a list on the service
    #[intent]
    UpdateListTitle {
        /// List to rename
        list_id: ListId,
        /// New name
        title: String,
    },

    /// Load one list's tasks from the service
    #[intent]
    FetchTasks {
        /// The list
        list_id: ListId,
    },

    /// Create a task on the service
    #[intent]
    CreateTask {
        /// Owning list
        list_id: ListId,
        /// Display text
        title: String,
    },

    /// Delete a task on the service
    #[intent]
    DeleteTask {
        /// Owning list
        list_id: ListId,
        /// Task to delete
        task_id: TaskId,
    },

    /// Change a task's completion state on the service
    #[intent]
    UpdateTaskStatus {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
        /// New state
        status: TaskStatus,
    },

    /// Rename a task on the service
    #[intent]
    UpdateTaskTitle {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
        /// New title
        title: String,
    },

    // ========== Resolved by the reducer ==========
    /// `AddList` with its id resolved
    #[outcome]
    ListAdded {
        /// Fresh id
        list_id: ListId,
        /// Display name
        title: String,
    },

    /// `AddTask` with its id resolved
    #[outcome]
    TaskAdded {
        /// Owning list
        list_id: ListId,
        /// Fresh id
        task_id: TaskId,
        /// Display text
        title: String,
    },

    /// An intent was rejected before any mutation
    #[outcome]
    ValidationFailed {
        /// Why
        error: TodoError,
    },

    // ========== Remote outcomes ==========
    /// Lists loaded from the service
    #[outcome]
    ListsFetched {
        /// Lists, in service order
        lists: Vec<ListRecord>,
    },

    /// The service created a list
    #[outcome]
    ListCreated {
        /// The new list
        list: ListRecord,
    },

    /// The service deleted a list
    #[outcome]
    ListDeleted {
        /// The deleted list
        list_id: ListId,
    },

    /// The service renamed a list
    #[outcome]
    ListRenamed {
        /// The list
        list_id: ListId,
        /// New name
        title: String,
    },

    /// Tasks of one list loaded from the service
    #[outcome]
    TasksFetched {
        /// The list
        list_id: ListId,
        /// Tasks, in service order
        tasks: Vec<TaskRecord>,
    },

    /// The service created a task
    #[outcome]
    TaskCreated {
        /// The new task
        task: TaskRecord,
    },

    /// The service accepted a task update
    #[outcome]
    TaskUpdated {
        /// Owning list
        list_id: ListId,
        /// The task
        task_id: TaskId,
        /// Fields now stored by the service
        model: UpdateTaskModel,
    },

    /// The service deleted a task
    #[outcome]
    TaskDeleted {
        /// Owning list
        list_id: ListId,
        /// The deleted task
        task_id: TaskId,
    },

    /// A remote request was refused or did not complete
    #[outcome]
    RequestFailed {
        /// What the request was about
        target: RequestTarget,
        /// User-visible error
        error: AppError,
    },
}

impl TodoAction {
    /// Whether this intent needs the remote service
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::FetchLists
                | Self::CreateList { .. }
                | Self::DeleteList { .. }
                | Self::UpdateListTitle { .. }
                | Self::FetchTasks { .. }
                | Self::CreateTask { .. }
                | Self::DeleteTask { .. }
                | Self::UpdateTaskStatus { .. }
                | Self::UpdateTaskTitle { .. }
        )
    }

    /// Whether this outcome reports a successful remote request
    #[must_use]
    pub const fn is_remote_success(&self) -> bool {
        matches!(
            self,
            Self::ListsFetched { .. }
                | Self::ListCreated { .. }
                | Self::ListDeleted { .. }
                | Self::ListRenamed { .. }
                | Self::TasksFetched { .. }
                | Self::TaskCreated { .. }
                | Self::TaskUpdated { .. }
                | Self::TaskDeleted { .. }
        )
    }
}
