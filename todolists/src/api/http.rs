//! HTTP implementation of the remote to-do service

use super::{ApiFuture, Envelope, ItemData, ListRecord, TaskRecord, TasksPage, TodoApi, UpdateTaskModel};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{ListId, TaskId};
use futures::FutureExt;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Remote to-do service client
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTodoApi {
    /// Create a client for `base_url` with reqwest's defaults
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send `API-KEY` with every request
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Build a client from configuration
    ///
    /// Returns `Ok(None)` when no base URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RequestFailed`] if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Option<Self>, ApiError> {
        let Some(base_url) = &config.base_url else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Some(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }))
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("content-type", "application/json");
        match &self.api_key {
            Some(key) => builder.header("API-KEY", key),
            None => builder,
        }
    }

    /// Send and parse the body as `T`, mapping non-success statuses
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    /// Send, unwrap the `resultCode` envelope, and parse `data` as `T`
    async fn send_enveloped<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let data = Self::send::<Envelope>(request).await?.into_data()?;
        serde_json::from_value(data).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }

    /// Send and unwrap the envelope, ignoring `data`
    async fn send_command(request: RequestBuilder) -> Result<(), ApiError> {
        Self::send::<Envelope>(request).await?.into_data().map(|_| ())
    }
}

impl TodoApi for HttpTodoApi {
    fn get_lists(&self) -> ApiFuture<'_, Vec<ListRecord>> {
        Self::send(self.request(Method::GET, "/todo-lists")).boxed()
    }

    fn create_list(&self, title: String) -> ApiFuture<'_, ListRecord> {
        let request = self
            .request(Method::POST, "/todo-lists")
            .json(&json!({ "title": title }));
        async move {
            let data: ItemData<ListRecord> = Self::send_enveloped(request).await?;
            Ok(data.item)
        }
        .boxed()
    }

    fn delete_list(&self, list_id: ListId) -> ApiFuture<'_, ()> {
        Self::send_command(self.request(Method::DELETE, &format!("/todo-lists/{list_id}"))).boxed()
    }

    fn update_list_title(&self, list_id: ListId, title: String) -> ApiFuture<'_, ()> {
        let request = self
            .request(Method::PUT, &format!("/todo-lists/{list_id}"))
            .json(&json!({ "title": title }));
        Self::send_command(request).boxed()
    }

    fn get_tasks(&self, list_id: ListId) -> ApiFuture<'_, Vec<TaskRecord>> {
        let request = self.request(Method::GET, &format!("/todo-lists/{list_id}/tasks"));
        async move {
            let page: TasksPage = Self::send(request).await?;
            match page.error {
                Some(message) => Err(ApiError::Rejected {
                    result_code: 1,
                    messages: vec![message],
                }),
                None => Ok(page.items),
            }
        }
        .boxed()
    }

    fn create_task(&self, list_id: ListId, title: String) -> ApiFuture<'_, TaskRecord> {
        let request = self
            .request(Method::POST, &format!("/todo-lists/{list_id}/tasks"))
            .json(&json!({ "title": title }));
        async move {
            let data: ItemData<TaskRecord> = Self::send_enveloped(request).await?;
            Ok(data.item)
        }
        .boxed()
    }

    fn delete_task(&self, list_id: ListId, task_id: TaskId) -> ApiFuture<'_, ()> {
        let path = format!("/todo-lists/{list_id}/tasks/{task_id}");
        Self::send_command(self.request(Method::DELETE, &path)).boxed()
    }

    fn update_task(
        &self,
        list_id: ListId,
        task_id: TaskId,
        model: UpdateTaskModel,
    ) -> ApiFuture<'_, ()> {
        let path = format!("/todo-lists/{list_id}/tasks/{task_id}");
        Self::send_command(self.request(Method::PUT, &path).json(&model)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let api = HttpTodoApi::new("https://example.test/api/1.1/").with_api_key("key");
        assert_eq!(api.base_url(), "https://example.test/api/1.1");
        assert_eq!(api.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_from_config_without_url_is_offline() {
        let config = ApiConfig {
            base_url: None,
            api_key: None,
            timeout_secs: 10,
        };
        assert!(HttpTodoApi::from_config(&config).unwrap().is_none());
    }
}
