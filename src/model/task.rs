use serde::{Deserialize, Serialize};

/// ClickUp's 1–4 urgency scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
}

impl Priority {
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Priority::Urgent),
            2 => Some(Priority::High),
            3 => Some(Priority::Normal),
            4 => Some(Priority::Low),
            _ => None,
        }
    }

    /// The numeric value the ClickUp API expects.
    pub fn value(self) -> u8 {
        match self {
            Priority::Urgent => 1,
            Priority::High => 2,
            Priority::Normal => 3,
            Priority::Low => 4,
        }
    }

    /// Urgent and High tickets get their images attached and a Slack ping.
    pub fn alerting(self) -> bool {
        matches!(self, Priority::Urgent | Priority::High)
    }
}

/// A ClickUp task as returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Task {
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// Everything needed to create a task from an issue.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub request_type_field_id: String,
    pub request_type_id: String,
}

/// Fields reconciled onto an existing task. `None` means leave untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub status: Option<String>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskComment {
    pub author: String,
    pub text: String,
}
