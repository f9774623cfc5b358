use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::{expect_json, expect_success, TaskBoard};
use crate::config::ClickUpConfig;
use crate::error::SyncResult;
use crate::model::{Priority, Task, TaskComment, TaskDraft, TaskUpdate};
use crate::util::images;

const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

pub struct ClickUpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    list_id: String,
    space_id: Option<String>,
}

#[derive(Deserialize)]
struct ListDetails {
    #[serde(default)]
    statuses: Vec<ListStatus>,
}

#[derive(Deserialize)]
struct ListStatus {
    status: String,
}

// A response without a `tasks` key means an empty page, not an error.
#[derive(Deserialize)]
struct TasksPage {
    #[serde(default)]
    tasks: Vec<CuTask>,
    #[serde(default)]
    last_page: Option<bool>,
}

#[derive(Deserialize)]
struct CuTask {
    id: String,
    name: String,
    description: Option<String>,
    status: Option<CuStatus>,
    priority: Option<CuPriority>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct CuStatus {
    status: String,
}

#[derive(Deserialize)]
struct CuPriority {
    // ClickUp returns the 1–4 priority id as a string
    id: String,
}

#[derive(Deserialize)]
struct FieldsResponse {
    #[serde(default)]
    fields: Vec<CuField>,
}

#[derive(Deserialize)]
struct CuField {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<CuComment>,
}

#[derive(Deserialize)]
struct CuComment {
    comment_text: Option<String>,
    user: Option<CuUser>,
}

#[derive(Deserialize)]
struct CuUser {
    username: String,
}

#[derive(Serialize)]
struct CreateTaskBody<'a> {
    name: &'a str,
    description: &'a str,
    status: &'a str,
    priority: u8,
    assignees: &'a [u64],
    custom_fields: Vec<CustomFieldValue<'a>>,
}

#[derive(Serialize)]
struct CustomFieldValue<'a> {
    id: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct UpdateTaskBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    comment_text: &'a str,
}

impl ClickUpClient {
    pub fn new(config: &ClickUpConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: &ClickUpConfig, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            list_id: config.list_id.clone(),
            space_id: config.space_id.clone(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .header("Authorization", &self.api_key)
    }
}

impl From<CuTask> for Task {
    fn from(task: CuTask) -> Self {
        let priority = task
            .priority
            .and_then(|p| p.id.parse::<u8>().ok())
            .and_then(Priority::from_value);
        Task {
            id: task.id,
            name: task.name,
            description: task.description,
            status: task.status.map(|s| s.status),
            priority,
            url: task.url,
        }
    }
}

#[async_trait]
impl TaskBoard for ClickUpClient {
    async fn list_statuses(&self) -> SyncResult<Vec<String>> {
        let response = self.get(&format!("/list/{}", self.list_id)).send().await?;
        let details: ListDetails = expect_json(response, "ClickUp").await?;
        Ok(details.statuses.into_iter().map(|s| s.status).collect())
    }

    async fn list_tasks(&self) -> SyncResult<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut page = 0u32;
        loop {
            let response = self
                .get(&format!("/list/{}/task", self.list_id))
                .query(&[("page", page.to_string())])
                .send()
                .await?;
            let batch: TasksPage = expect_json(response, "ClickUp").await?;
            if batch.tasks.is_empty() {
                return Ok(tasks);
            }
            tasks.extend(batch.tasks.into_iter().map(Task::from));
            if batch.last_page == Some(true) {
                return Ok(tasks);
            }
            page += 1;
        }
    }

    async fn create_task(&self, draft: &TaskDraft) -> SyncResult<Task> {
        let body = CreateTaskBody {
            name: &draft.name,
            description: &draft.description,
            status: &draft.status,
            priority: draft.priority.value(),
            assignees: &[],
            custom_fields: vec![CustomFieldValue {
                id: &draft.request_type_field_id,
                value: &draft.request_type_id,
            }],
        };
        let response = self
            .client
            .post(format!("{}/list/{}/task", self.base_url, self.list_id))
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let task: CuTask = expect_json(response, "ClickUp").await?;
        Ok(task.into())
    }

    async fn update_task(&self, task_id: &str, update: &TaskUpdate) -> SyncResult<()> {
        let body = UpdateTaskBody {
            description: update.description.as_deref(),
            status: update.status.as_deref(),
        };
        let response = self
            .client
            .put(format!("{}/task/{task_id}", self.base_url))
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;
        expect_success(response, "ClickUp").await?;
        Ok(())
    }

    async fn add_comment(&self, task_id: &str, text: &str) -> SyncResult<()> {
        let response = self
            .client
            .post(format!("{}/task/{task_id}/comment", self.base_url))
            .header("Authorization", &self.api_key)
            .json(&CommentBody { comment_text: text })
            .send()
            .await?;
        expect_success(response, "ClickUp").await?;
        Ok(())
    }

    async fn list_task_comments(&self, task_id: &str) -> SyncResult<Vec<TaskComment>> {
        let response = self
            .get(&format!("/task/{task_id}/comment"))
            .send()
            .await?;
        let comments: CommentsResponse = expect_json(response, "ClickUp").await?;
        Ok(comments
            .comments
            .into_iter()
            .map(|comment| TaskComment {
                author: comment.user.map(|u| u.username).unwrap_or_default(),
                text: comment.comment_text.unwrap_or_default(),
            })
            .collect())
    }

    async fn attach_image(&self, task_id: &str, image_url: &str) -> SyncResult<()> {
        let download = self.client.get(image_url).send().await?;
        let download = expect_success(download, "image host").await?;
        let bytes = download.bytes().await?;

        let part = Part::bytes(bytes.to_vec()).file_name(images::file_name(image_url).to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(format!("{}/task/{task_id}/attachment", self.base_url))
            .header("Authorization", &self.api_key)
            .multipart(form)
            .send()
            .await?;
        expect_success(response, "ClickUp").await?;
        Ok(())
    }

    async fn request_type_field_id(&self) -> SyncResult<Option<String>> {
        let Some(space_id) = &self.space_id else {
            return Ok(None);
        };
        let response = self.get(&format!("/space/{space_id}/field")).send().await?;
        let fields: FieldsResponse = expect_json(response, "ClickUp").await?;
        Ok(fields
            .fields
            .into_iter()
            .find(|field| field.name.eq_ignore_ascii_case("request type"))
            .map(|field| field.id))
    }
}
