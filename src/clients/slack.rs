use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::{expect_success, Notifier};
use crate::error::SyncResult;

pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

#[derive(Serialize)]
struct WebhookBody<'a> {
    text: &'a str,
}

impl SlackNotifier {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn task_created(
        &self,
        issue_url: &str,
        task_name: &str,
        task_url: &str,
    ) -> SyncResult<()> {
        let text = format!(
            "New ticket is created: {task_name}\nTicket link: {task_url}\nGitHub issue link: {issue_url}"
        );
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookBody { text: &text })
            .send()
            .await?;
        expect_success(response, "Slack").await?;
        Ok(())
    }
}

/// Stands in when no webhook is configured.
pub struct NoNotifier;

#[async_trait]
impl Notifier for NoNotifier {
    async fn task_created(
        &self,
        _issue_url: &str,
        task_name: &str,
        _task_url: &str,
    ) -> SyncResult<()> {
        debug!(task_name, "no slack webhook configured, skipping notification");
        Ok(())
    }
}
