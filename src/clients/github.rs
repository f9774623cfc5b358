use async_trait::async_trait;
use serde::Deserialize;

use super::{expect_json, IssueSource};
use crate::config::GitHubConfig;
use crate::error::SyncResult;
use crate::model::{Issue, IssueComment, IssueState};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const PAGE_SIZE: usize = 100;
// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("ghcu-sync/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    owner: String,
    repo: String,
}

#[derive(Deserialize)]
struct GhIssue {
    number: u64,
    title: String,
    body: Option<String>,
    html_url: String,
    state: String,
    #[serde(default)]
    labels: Vec<GhLabel>,
    /// Present when the "issue" is really a pull request.
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GhLabel {
    name: String,
}

#[derive(Deserialize)]
struct GhComment {
    user: GhUser,
    body: Option<String>,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(config: &GitHubConfig, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: config.token.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        }
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/{}/issues", self.base_url, self.owner, self.repo)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> SyncResult<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;
        expect_json(response, "GitHub").await
    }
}

impl From<GhIssue> for Issue {
    fn from(issue: GhIssue) -> Self {
        let state = if issue.state == "closed" {
            IssueState::Closed
        } else {
            IssueState::Open
        };
        Issue {
            number: issue.number,
            title: issue.title,
            body: issue.body,
            html_url: issue.html_url,
            state,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
        }
    }
}

#[async_trait]
impl IssueSource for GitHubClient {
    async fn list_open_issues(&self) -> SyncResult<Vec<Issue>> {
        let url = self.issues_url();
        let mut issues = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<GhIssue> = self
                .get(
                    &url,
                    &[
                        ("state", "open".to_string()),
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            let batch_len = batch.len();
            issues.extend(
                batch
                    .into_iter()
                    // the issues endpoint interleaves pull requests
                    .filter(|issue| issue.pull_request.is_none())
                    .map(Issue::from),
            );
            if batch_len < PAGE_SIZE {
                return Ok(issues);
            }
            page += 1;
        }
    }

    async fn issue(&self, number: u64) -> SyncResult<Issue> {
        let url = format!("{}/{number}", self.issues_url());
        let issue: GhIssue = self.get(&url, &[]).await?;
        Ok(issue.into())
    }

    async fn list_comments(&self, number: u64) -> SyncResult<Vec<IssueComment>> {
        let url = format!("{}/{number}/comments", self.issues_url());
        let comments: Vec<GhComment> = self.get(&url, &[]).await?;
        Ok(comments
            .into_iter()
            .map(|comment| IssueComment {
                author: comment.user.login,
                body: comment.body.unwrap_or_default(),
            })
            .collect())
    }
}
