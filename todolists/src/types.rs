//! Entity model: lists, tasks, and the small enumerations they carry.
//!
//! Lists and tasks are plain values. A list never holds its tasks; they live
//! in per-list buckets in [`TasksState`](crate::tasks::TasksState), keyed by
//! [`ListId`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Maximum title length accepted for lists and tasks
pub const MAX_TITLE_LEN: usize = 100;

/// Opaque identifier of a list
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    /// Wraps an identifier issued locally or by the remote service
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque identifier of a task, unique within its list's bucket
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier issued locally or by the remote service
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Which tasks of a list are exposed for rendering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks only
    Completed,
}

impl FilterValue {
    /// Whether a task passes this filter
    #[must_use]
    pub fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_done(),
            Self::Completed => task.is_done(),
        }
    }
}

/// Lifecycle of an in-flight request, tracked globally and per entity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing is happening
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last request succeeded
    Succeeded,
    /// The last request failed
    Failed,
}

/// Completion state of a task, a small integer on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
    /// Not started
    #[default]
    New = 0,
    /// Being worked on
    InProgress = 1,
    /// Done
    Completed = 2,
    /// Not yet committed to
    Draft = 3,
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::New),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Draft),
            other => Err(format!("unknown task status {other}")),
        }
    }
}

impl From<bool> for TaskStatus {
    fn from(done: bool) -> Self {
        if done { Self::Completed } else { Self::New }
    }
}

/// Task priority, a small integer on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
    /// Low
    #[default]
    Low = 0,
    /// Middle
    Middle = 1,
    /// High
    Hi = 2,
    /// Urgent
    Urgently = 3,
    /// Deferred
    Later = 4,
}

impl From<TaskPriority> for u8 {
    fn from(priority: TaskPriority) -> Self {
        priority as u8
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Middle),
            2 => Ok(Self::Hi),
            3 => Ok(Self::Urgently),
            4 => Ok(Self::Later),
            other => Err(format!("unknown task priority {other}")),
        }
    }
}

/// A named, independently filterable collection of tasks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Unique identifier
    pub id: ListId,
    /// Display name
    pub title: String,
    /// View filter for this list's tasks
    pub filter: FilterValue,
    /// In-flight request state for this list
    pub entity_status: RequestStatus,
    /// When the remote service created the list
    pub added_date: Option<NaiveDateTime>,
    /// Server-side ordering hint
    pub order: i32,
}

impl TodoList {
    /// Creates a list with filter `all` and no request in flight
    #[must_use]
    pub fn new(id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
            added_date: None,
            order: 0,
        }
    }
}

/// A titled, completable unit of work belonging to exactly one list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the owning bucket
    pub id: TaskId,
    /// Back-reference to the owning list
    pub list_id: ListId,
    /// Display text
    pub title: String,
    /// Free-form description
    pub description: Option<String>,
    /// Completion state
    pub status: TaskStatus,
    /// Priority
    pub priority: TaskPriority,
    /// Planned start
    pub start_date: Option<NaiveDateTime>,
    /// Deadline
    pub deadline: Option<NaiveDateTime>,
    /// Creation time
    pub added_date: Option<NaiveDateTime>,
    /// Server-side ordering hint
    pub order: i32,
    /// In-flight request state for this task; never persisted
    pub entity_status: RequestStatus,
}

impl Task {
    /// Creates a fresh, not-done task
    #[must_use]
    pub fn new(id: TaskId, list_id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            list_id,
            title: title.into(),
            description: None,
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            added_date: None,
            order: 0,
            entity_status: RequestStatus::Idle,
        }
    }

    /// Sets the creation time
    #[must_use]
    pub const fn added_at(mut self, added_date: NaiveDateTime) -> Self {
        self.added_date = Some(added_date);
        self
    }

    /// Sets the completion state
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the task is completed
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
