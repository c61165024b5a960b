//! Remote sync layer
//!
//! [`TodoApi`] is the request/response contract of the remote to-do service.
//! Reducers never call it directly: they return `Effect::Future` values that
//! call it and resolve to a single outcome action.
//!
//! - [`HttpTodoApi`]: the real service over HTTP
//! - [`MockTodoApi`]: an in-memory service for tests and offline demos

use crate::error::ApiError;
use crate::types::{ListId, Task, TaskId, TaskPriority, TaskStatus, TodoList};
use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

mod http;
mod mock;

pub use http::HttpTodoApi;
pub use mock::MockTodoApi;

/// Future returned by every [`TodoApi`] call
pub type ApiFuture<'a, T> = BoxFuture<'a, Result<T, ApiError>>;

/// Operations of the remote to-do service
///
/// Returns boxed futures instead of using async fn so the trait stays
/// dyn-compatible and can be injected as `Arc<dyn TodoApi>`.
///
/// Every call distinguishes two failure classes: [`ApiError::Rejected`] when
/// the service answered with a non-zero `resultCode`, and every other variant
/// for transport, protocol, or timeout failures.
pub trait TodoApi: Send + Sync {
    /// Fetch all lists
    ///
    /// # Errors
    ///
    /// Transport or protocol failure.
    fn get_lists(&self) -> ApiFuture<'_, Vec<ListRecord>>;

    /// Create a list; the service assigns its id
    ///
    /// # Errors
    ///
    /// Rejection by the service, or transport failure.
    fn create_list(&self, title: String) -> ApiFuture<'_, ListRecord>;

    /// Delete a list and its tasks
    ///
    /// # Errors
    ///
    /// Rejection by the service, or transport failure.
    fn delete_list(&self, list_id: ListId) -> ApiFuture<'_, ()>;

    /// Rename a list
    ///
    /// # Errors
    ///
    /// Rejection by the service, or transport failure.
    fn update_list_title(&self, list_id: ListId, title: String) -> ApiFuture<'_, ()>;

    /// Fetch the tasks of one list
    ///
    /// # Errors
    ///
    /// Transport or protocol failure, or an error reported in the page body.
    fn get_tasks(&self, list_id: ListId) -> ApiFuture<'_, Vec<TaskRecord>>;

    /// Create a task; the service assigns its id
    ///
    /// # Errors
    ///
    /// Rejection by the service, or transport failure.
    fn create_task(&self, list_id: ListId, title: String) -> ApiFuture<'_, TaskRecord>;

    /// Delete a task
    ///
    /// # Errors
    ///
    /// Rejection by the service, or transport failure.
    fn delete_task(&self, list_id: ListId, task_id: TaskId) -> ApiFuture<'_, ()>;

    /// Replace a task's editable fields
    ///
    /// # Errors
    ///
    /// Rejection by the service, or transport failure.
    fn update_task(
        &self,
        list_id: ListId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, ()>;
}

/// A list as the service describes it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecord {
    /// Server-assigned id
    pub id: ListId,
    /// Display name
    pub title: String,
    /// Creation time
    #[serde(default)]
    pub added_date: Option<NaiveDateTime>,
    /// Ordering hint
    #[serde(default)]
    pub order: i32,
}

impl From<ListRecord> for TodoList {
    fn from(record: ListRecord) -> Self {
        let mut list = Self::new(record.id, record.title);
        list.added_date = record.added_date;
        list.order = record.order;
        list
    }
}

/// A task as the service describes it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Server-assigned id
    pub id: TaskId,
    /// Owning list
    pub todo_list_id: ListId,
    /// Display text
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Completion state
    #[serde(default)]
    pub status: TaskStatus,
    /// Priority
    #[serde(default)]
    pub priority: TaskPriority,
    /// Planned start
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    /// Deadline
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
    /// Creation time
    #[serde(default)]
    pub added_date: Option<NaiveDateTime>,
    /// Ordering hint
    #[serde(default)]
    pub order: i32,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            list_id: record.todo_list_id,
            title: record.title,
            description: record.description,
            status: record.status,
            priority: record.priority,
            start_date: record.start_date,
            deadline: record.deadline,
            added_date: record.added_date,
            order: record.order,
            entity_status: crate::types::RequestStatus::Idle,
        }
    }
}

/// Full set of editable task fields, sent on every task update
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Completion state
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start
    pub start_date: Option<NaiveDateTime>,
    /// Deadline
    pub deadline: Option<NaiveDateTime>,
}

impl From<&Task> for UpdateTaskModel {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            start_date: task.start_date,
            deadline: task.deadline,
        }
    }
}

impl UpdateTaskModel {
    /// Writes these fields onto a task
    pub fn apply_to(&self, task: &mut Task) {
        task.title.clone_from(&self.title);
        task.description.clone_from(&self.description);
        task.status = self.status;
        task.priority = self.priority;
        task.start_date = self.start_date;
        task.deadline = self.deadline;
    }
}

/// Envelope of every mutating response: `{ resultCode, messages, data }`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope {
    pub result_code: i32,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// The payload if `resultCode` is zero, the service's refusal otherwise
    pub(crate) fn into_data(self) -> Result<serde_json::Value, ApiError> {
        if self.result_code == 0 {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                result_code: self.result_code,
                messages: self.messages,
            })
        }
    }
}

/// `data` of a create response: `{ item }`
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ItemData<T> {
    pub item: T,
}

/// Page of tasks returned by `GET /todo-lists/{id}/tasks`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TasksPage {
    pub items: Vec<TaskRecord>,
    #[serde(default)]
    pub error: Option<String>,
}
