pub mod clickup;
pub mod github;
pub mod slack;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{SyncError, SyncResult};
use crate::model::{Issue, IssueComment, Task, TaskComment, TaskDraft, TaskUpdate};

/// Where issues come from.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// All open issues, in listing order.
    async fn list_open_issues(&self) -> SyncResult<Vec<Issue>>;
    /// Re-fetch a single issue for the freshest body.
    async fn issue(&self, number: u64) -> SyncResult<Issue>;
    async fn list_comments(&self, number: u64) -> SyncResult<Vec<IssueComment>>;
}

/// Where tasks go.
#[async_trait]
pub trait TaskBoard: Send + Sync {
    /// Status names defined on the list, in board order.
    async fn list_statuses(&self) -> SyncResult<Vec<String>>;
    async fn list_tasks(&self) -> SyncResult<Vec<Task>>;
    async fn create_task(&self, draft: &TaskDraft) -> SyncResult<Task>;
    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> SyncResult<()>;
    async fn add_comment(&self, task_id: &str, text: &str) -> SyncResult<()>;
    async fn list_task_comments(&self, task_id: &str) -> SyncResult<Vec<TaskComment>>;
    /// Download the image behind `image_url` and attach it to the task.
    async fn attach_image(&self, task_id: &str, image_url: &str) -> SyncResult<()>;
    /// Discover the "Request Type" custom field on the configured space.
    async fn request_type_field_id(&self) -> SyncResult<Option<String>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn task_created(
        &self,
        issue_url: &str,
        task_name: &str,
        task_url: &str,
    ) -> SyncResult<()>;
}

/// Turn a response into parsed JSON: non-2xx becomes an `Upstream` error
/// carrying the status and raw body, a payload that doesn't decode becomes
/// a `Data` error.
pub(crate) async fn expect_json<T: DeserializeOwned>(
    response: reqwest::Response,
    service: &'static str,
) -> SyncResult<T> {
    let response = expect_success(response, service).await?;
    match response.json().await {
        Ok(value) => Ok(value),
        Err(err) if err.is_decode() => Err(SyncError::Data {
            service,
            detail: err.to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn expect_success(
    response: reqwest::Response,
    service: &'static str,
) -> SyncResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SyncError::Upstream {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
