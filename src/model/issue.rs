use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// A GitHub issue as the sync sees it. Read-only: issues are created and
/// closed on GitHub, never from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub html_url: String,
    pub state: IssueState,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Issue {
    /// Title key used for matching against ClickUp task names.
    pub fn normalized_title(&self) -> String {
        self.title.trim().to_lowercase()
    }

    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    pub author: String,
    pub body: String,
}
