//! Task collection access over the backend's JSON API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{CreateTaskRequest, Task, UpdateTaskRequest};
use thiserror::Error;
use uuid::Uuid;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Request, RequestCredentials, RequestInit, Response};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No browser window")]
    NoWindow,
    #[error("Failed to build request: {0}")]
    Request(String),
    #[error("Failed to send request: {0}")]
    Network(String),
    #[error("Server responded with status {0}")]
    Status(u16),
    #[error("Failed to read response: {0}")]
    Decode(String),
}

/// CRUD over one document collection.
#[async_trait(?Send)]
pub trait TaskStore {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Returns the id the store assigned.
    async fn create(&self, request: CreateTaskRequest) -> Result<Uuid, StoreError>;

    async fn update(&self, id: Uuid, request: UpdateTaskRequest) -> Result<(), StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct HttpStore {
    base: String,
}

impl HttpStore {
    pub fn new(collection: &str) -> Self {
        Self {
            base: format!("/api/{}", collection),
        }
    }

    fn item_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.base, id)
    }
}

#[async_trait(?Send)]
impl TaskStore for HttpStore {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let body = send("GET", &self.base, None).await?;
        decode(&body)
    }

    async fn create(&self, request: CreateTaskRequest) -> Result<Uuid, StoreError> {
        let body = send("POST", &self.base, Some(encode(&request)?)).await?;
        let task: Task = decode(&body)?;
        Ok(task.id)
    }

    async fn update(&self, id: Uuid, request: UpdateTaskRequest) -> Result<(), StoreError> {
        send("PUT", &self.item_url(id), Some(encode(&request)?)).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        send("DELETE", &self.item_url(id), None).await?;
        Ok(())
    }
}

pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Request(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Sends a same-origin request and returns the response body. Non-2xx
/// statuses are errors.
pub(crate) async fn send(method: &str, url: &str, body: Option<String>) -> Result<String, StoreError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_credentials(RequestCredentials::SameOrigin);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| StoreError::Request(format!("{:?}", e)))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| StoreError::Request(format!("{:?}", e)))?;
    }

    let promise = window()
        .ok_or(StoreError::NoWindow)?
        .fetch_with_request(&request);
    let response: Response = JsFuture::from(promise)
        .await
        .map_err(|e| StoreError::Network(format!("{:?}", e)))?
        .into();

    if !response.ok() {
        return Err(StoreError::Status(response.status()));
    }

    let text_promise = response
        .text()
        .map_err(|e| StoreError::Decode(format!("{:?}", e)))?;
    JsFuture::from(text_promise)
        .await
        .map_err(|e| StoreError::Decode(format!("{:?}", e)))?
        .as_string()
        .ok_or_else(|| StoreError::Decode("body is not text".to_string()))
}
