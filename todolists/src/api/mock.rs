//! In-memory remote to-do service
//!
//! Behaves like the real service closely enough for reducer and store tests:
//! ids are server-assigned, new lists and tasks come back as records, and
//! unknown ids are refused with a non-zero result code. Failures can be
//! scripted one call at a time.

use super::{ApiFuture, ListRecord, TaskRecord, TodoApi, UpdateTaskModel};
use crate::error::ApiError;
use crate::types::{ListId, TaskId, MAX_TITLE_LEN};
use chrono::Utc;
use futures::FutureExt;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A failure the next call will return instead of doing its work
#[derive(Clone, Debug)]
enum Scripted {
    Reject(Vec<String>),
    Fail(String),
}

#[derive(Debug, Default)]
struct Server {
    lists: Vec<ListRecord>,
    tasks: HashMap<ListId, Vec<TaskRecord>>,
    script: VecDeque<Scripted>,
    calls: Vec<&'static str>,
}

impl Server {
    fn begin(&mut self, call: &'static str) -> Result<(), ApiError> {
        self.calls.push(call);
        match self.script.pop_front() {
            None => Ok(()),
            Some(Scripted::Reject(messages)) => Err(ApiError::Rejected {
                result_code: 1,
                messages,
            }),
            Some(Scripted::Fail(message)) => Err(ApiError::RequestFailed(message)),
        }
    }

    fn bucket_mut(&mut self, list_id: &ListId) -> Result<&mut Vec<TaskRecord>, ApiError> {
        self.tasks.get_mut(list_id).ok_or_else(|| rejected("Todolist not found"))
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        result_code: 1,
        messages: vec![message.to_string()],
    }
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(rejected("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(rejected("Title max length is 100 characters"));
    }
    Ok(())
}

/// In-memory [`TodoApi`]
///
/// Cloning shares the same server.
#[derive(Clone, Debug, Default)]
pub struct MockTodoApi {
    server: Arc<Mutex<Server>>,
    latency: Option<Duration>,
}

impl MockTodoApi {
    /// An empty server
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seed a list (and optionally tasks) before any request
    pub async fn seed_list(&self, title: &str, tasks: &[&str]) -> ListId {
        let mut server = self.server.lock().await;
        let list_id = ListId::new(uuid::Uuid::new_v4().to_string());
        server.lists.push(ListRecord {
            id: list_id.clone(),
            title: title.to_string(),
            added_date: Some(Utc::now().naive_utc()),
            order: 0,
        });
        let bucket = tasks
            .iter()
            .map(|title| new_task(&list_id, title))
            .collect();
        server.tasks.insert(list_id.clone(), bucket);
        list_id
    }

    /// The next call is refused with `resultCode: 1` and these messages
    pub async fn reject_next(&self, messages: &[&str]) {
        self.server
            .lock()
            .await
            .script
            .push_back(Scripted::Reject(messages.iter().map(ToString::to_string).collect()));
    }

    /// The next call fails at the transport level
    pub async fn fail_next(&self, message: &str) {
        self.server
            .lock()
            .await
            .script
            .push_back(Scripted::Fail(message.to_string()));
    }

    /// Names of the calls received so far, in order
    pub async fn calls(&self) -> Vec<&'static str> {
        self.server.lock().await.calls.clone()
    }

    /// Tasks the server holds for a list
    pub async fn tasks_of(&self, list_id: &ListId) -> Vec<TaskRecord> {
        self.server
            .lock()
            .await
            .tasks
            .get(list_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn new_task(list_id: &ListId, title: &str) -> TaskRecord {
    TaskRecord {
        id: TaskId::new(uuid::Uuid::new_v4().to_string()),
        todo_list_id: list_id.clone(),
        title: title.to_string(),
        description: None,
        status: crate::types::TaskStatus::New,
        priority: crate::types::TaskPriority::Low,
        start_date: None,
        deadline: None,
        added_date: Some(Utc::now().naive_utc()),
        order: 0,
    }
}

impl TodoApi for MockTodoApi {
    fn get_lists(&self) -> ApiFuture<'_, Vec<ListRecord>> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("get_lists")?;
            Ok(server.lists.clone())
        }
        .boxed()
    }

    fn create_list(&self, title: String) -> ApiFuture<'_, ListRecord> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("create_list")?;
            check_title(&title)?;

            let list = ListRecord {
                id: ListId::new(uuid::Uuid::new_v4().to_string()),
                title,
                added_date: Some(Utc::now().naive_utc()),
                order: 0,
            };
            server.lists.insert(0, list.clone());
            server.tasks.insert(list.id.clone(), Vec::new());
            Ok(list)
        }
        .boxed()
    }

    fn delete_list(&self, list_id: ListId) -> ApiFuture<'_, ()> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("delete_list")?;
            if server.tasks.remove(&list_id).is_none() {
                return Err(rejected("Todolist not found"));
            }
            server.lists.retain(|l| l.id != list_id);
            Ok(())
        }
        .boxed()
    }

    fn update_list_title(&self, list_id: ListId, title: String) -> ApiFuture<'_, ()> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("update_list_title")?;
            check_title(&title)?;
            let list = server
                .lists
                .iter_mut()
                .find(|l| l.id == list_id)
                .ok_or_else(|| rejected("Todolist not found"))?;
            list.title = title;
            Ok(())
        }
        .boxed()
    }

    fn get_tasks(&self, list_id: ListId) -> ApiFuture<'_, Vec<TaskRecord>> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("get_tasks")?;
            Ok(server.bucket_mut(&list_id)?.clone())
        }
        .boxed()
    }

    fn create_task(&self, list_id: ListId, title: String) -> ApiFuture<'_, TaskRecord> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("create_task")?;
            check_title(&title)?;
            let task = new_task(&list_id, &title);
            server.bucket_mut(&list_id)?.insert(0, task.clone());
            Ok(task)
        }
        .boxed()
    }

    fn delete_task(&self, list_id: ListId, task_id: TaskId) -> ApiFuture<'_, ()> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("delete_task")?;
            let bucket = server.bucket_mut(&list_id)?;
            let before = bucket.len();
            bucket.retain(|t| t.id != task_id);
            if bucket.len() == before {
                return Err(rejected("Task not found"));
            }
            Ok(())
        }
        .boxed()
    }

    fn update_task(
        &self,
        list_id: ListId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, ()> {
        async move {
            self.pause().await;
            let mut server = self.server.lock().await;
            server.begin("update_task")?;
            check_title(&model.title)?;
            let task = server
                .bucket_mut(&list_id)?
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| rejected("Task not found"))?;
            task.title = model.title;
            task.description = model.description;
            task.status = model.status;
            task.priority = model.priority;
            task.start_date = model.start_date;
            task.deadline = model.deadline;
            Ok(())
        }
        .boxed()
    }
}
