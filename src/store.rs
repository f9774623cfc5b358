use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::data_dir;
use crate::error::SyncResult;

/// One mirrored ticket: which ClickUp task an issue landed in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLink {
    pub task_id: String,
    /// Issue title at link time, kept for operator-facing diagnostics.
    pub title: String,
    pub linked_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    links: HashMap<u64, TaskLink>,
}

/// Persisted issue-number → task-id map. Title matching alone breaks when an
/// issue is renamed between runs; a recorded link keeps the correspondence
/// stable across renames.
pub struct LinkStore {
    path: PathBuf,
    data: StoreData,
}

impl LinkStore {
    pub fn open_default() -> SyncResult<Self> {
        Self::open(data_dir().join("links.json"))
    }

    pub fn open(path: PathBuf) -> SyncResult<Self> {
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            StoreData::default()
        };
        Ok(Self { path, data })
    }

    fn save(&self) -> SyncResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn task_id_for(&self, issue_number: u64) -> Option<&str> {
        self.data
            .links
            .get(&issue_number)
            .map(|link| link.task_id.as_str())
    }

    pub fn record(&mut self, issue_number: u64, task_id: &str, title: &str) -> SyncResult<()> {
        self.data.links.insert(
            issue_number,
            TaskLink {
                task_id: task_id.to_string(),
                title: title.to_string(),
                linked_at: Utc::now(),
            },
        );
        self.save()
    }

    /// Drop links whose task no longer exists in the fetched list, so a task
    /// deleted on the ClickUp side gets recreated instead of silently skipped.
    pub fn retain_tasks(&mut self, is_live: impl Fn(&str) -> bool) -> SyncResult<()> {
        let before = self.data.links.len();
        self.data.links.retain(|_, link| is_live(&link.task_id));
        if self.data.links.len() != before {
            self.save()?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.data.links.len()
    }
}
