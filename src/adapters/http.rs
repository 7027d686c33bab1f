//! HTTP task store
//!
//! Talks to the board's REST backend:
//!
//! - `GET    {base}/tasks` (optional `search`, `status`, `priority` query)
//! - `POST   {base}/tasks`
//! - `PUT    {base}/tasks/{id}` with only the changed fields
//! - `DELETE {base}/tasks/{id}`, answering `{ message, deletedTask }`
//!
//! 404 maps to [`StoreError::NotFound`], 400 to [`StoreError::Rejected`] and
//! everything else that is not a success, including timeouts, to
//! [`StoreError::Transport`].

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::BoardConfig;
use crate::core::models::{NewTask, Task, TaskId, UpdateRequest};
use crate::core::ports::{ListFilter, TaskStore};
use crate::error::StoreError;

/// Error body sent by the backend
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Body of a successful delete
#[derive(Debug, Deserialize)]
struct DeleteBody {
    #[serde(rename = "deletedTask")]
    deleted_task: Task,
}

/// Task store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    /// Store rooted at `base_url` (e.g. `http://localhost:3000/api`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| StoreError::Transport(format!("invalid api url {base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Store configured from a [`BoardConfig`]
    pub fn from_config(config: &BoardConfig) -> Result<Self, StoreError> {
        Self::new(&config.store.api_url, config.timeout())
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(path)
            .map_err(|e| StoreError::Transport(format!("invalid request path {path}: {e}")))
    }

    fn task_url(&self, id: &TaskId) -> Result<Url, StoreError> {
        let mut url = self.url("tasks")?;
        url.path_segments_mut()
            .map_err(|()| StoreError::Transport(format!("cannot address tasks under {}", self.base_url)))?
            .push(&id.to_string());
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, id: Option<&TaskId>) -> Result<T, StoreError> {
        let response = request.send().await.map_err(transport)?;
        let response = check(response, id).await?;
        response.json::<T>().await.map_err(transport)
    }
}

#[async_trait(?Send)]
impl TaskStore for HttpStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Task>, StoreError> {
        let mut url = self.url("tasks")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(search) = filter.search.as_deref() {
                query.append_pair("search", search);
            }
            if let Some(status) = filter.status {
                query.append_pair("status", status.as_str());
            }
            if let Some(priority) = filter.priority {
                query.append_pair("priority", priority.as_str());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        debug!("GET {url}");
        self.send(self.client.get(url), None).await
    }

    async fn create(&self, task: &NewTask) -> Result<Task, StoreError> {
        let url = self.url("tasks")?;
        debug!("POST {url}");
        self.send(self.client.post(url).json(task), None).await
    }

    async fn update(&self, request: &UpdateRequest) -> Result<Task, StoreError> {
        let url = self.task_url(&request.id)?;
        debug!("PUT {url} fields={:?}", request.fields().collect::<Vec<_>>());
        self.send(self.client.put(url).json(&request.body), Some(&request.id)).await
    }

    async fn delete(&self, id: &TaskId) -> Result<Task, StoreError> {
        let url = self.task_url(id)?;
        debug!("DELETE {url}");
        let body: DeleteBody = self.send(self.client.delete(url), Some(id)).await?;
        Ok(body.deleted_task)
    }
}

async fn check(response: Response, id: Option<&TaskId>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.to_string(),
    };

    Err(match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => StoreError::NotFound(id.clone()),
        (StatusCode::BAD_REQUEST, _) => StoreError::Rejected(message),
        _ => StoreError::Transport(format!("{status}: {message}")),
    })
}

fn transport(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Transport("request timed out".to_string())
    } else {
        StoreError::Transport(err.to_string())
    }
}
