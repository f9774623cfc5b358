use std::collections::HashMap;

use crate::error::{SyncError, SyncResult};
use crate::model::Priority;

/// Request-type ids of the deployment this replaces; overridable from the
/// config file.
const DEFAULT_REQUEST_TYPES: &[(&str, &str)] = &[
    ("bug", "bb6de1dc-da65-4a85-9d0e-5065919fede5"),
    ("enhancement", "15c61688-3ad5-4dc5-bb7f-17b6c6ff30d9"),
    ("question", "3328c6c2-06f8-41e4-a76c-4fb435df2bb2"),
    ("task", "7abfef5b-9190-4726-8ed5-d5e317eb9c93"),
];

const DEFAULT_PRIORITIES: &[(&str, u8)] = &[
    ("p0", 1),
    ("p1", 2),
    ("bug", 2),
    ("enhancement", 3),
    ("task", 3),
];

/// The two label lookup tables, loaded once per run and immutable after.
#[derive(Debug, Clone)]
pub struct LabelMaps {
    request_types: HashMap<String, String>,
    priorities: HashMap<String, Priority>,
    fallback_request_type: String,
}

impl LabelMaps {
    /// Build the maps, applying whole-map overrides from the config file.
    /// The `task` request-type entry is the creation fallback and must exist.
    pub fn new(
        request_type_overrides: Option<HashMap<String, String>>,
        priority_overrides: Option<HashMap<String, u8>>,
    ) -> SyncResult<Self> {
        let request_types: HashMap<String, String> = match request_type_overrides {
            Some(map) => map
                .into_iter()
                .map(|(label, id)| (label.to_lowercase(), id))
                .collect(),
            None => DEFAULT_REQUEST_TYPES
                .iter()
                .map(|(label, id)| (label.to_string(), id.to_string()))
                .collect(),
        };

        let priorities: HashMap<String, Priority> = match priority_overrides {
            Some(map) => {
                let mut priorities = HashMap::new();
                for (label, value) in map {
                    let priority = Priority::from_value(value).ok_or_else(|| {
                        SyncError::Configuration(format!(
                            "label_to_priority[\"{label}\"] = {value} is outside 1..=4"
                        ))
                    })?;
                    priorities.insert(label.to_lowercase(), priority);
                }
                priorities
            }
            None => DEFAULT_PRIORITIES
                .iter()
                .map(|(label, value)| {
                    let priority =
                        Priority::from_value(*value).unwrap_or(Priority::Normal);
                    (label.to_string(), priority)
                })
                .collect(),
        };

        let fallback_request_type = request_types.get("task").cloned().ok_or_else(|| {
            SyncError::Configuration(
                "label_to_request_type_id must define a \"task\" entry (creation fallback)"
                    .into(),
            )
        })?;

        Ok(Self {
            request_types,
            priorities,
            fallback_request_type,
        })
    }

    fn request_type_for(&self, key: &str) -> Option<&str> {
        self.request_types.get(key).map(String::as_str)
    }

    /// First label with a mapping wins; no match falls back to the `task` id.
    pub fn resolve_request_type<'a>(&'a self, labels: &[String]) -> &'a str {
        labels
            .iter()
            .find_map(|label| self.request_types.get(&label.to_lowercase()))
            .map(String::as_str)
            .unwrap_or(&self.fallback_request_type)
    }

    /// The most urgent priority among all mapped labels wins, so a p0 tag
    /// outranks the bug label's default no matter how GitHub orders them.
    /// Without any mapped label, the resolved request type decides: bug is
    /// urgent, enhancement/task/question are normal, anything unrecognized
    /// is high.
    pub fn resolve_priority(&self, labels: &[String], request_type_id: &str) -> Priority {
        if let Some(priority) = labels
            .iter()
            .filter_map(|label| self.priorities.get(&label.to_lowercase()))
            .min_by_key(|priority| priority.value())
        {
            return *priority;
        }

        if self.request_type_for("bug") == Some(request_type_id) {
            Priority::Urgent
        } else if ["enhancement", "task", "question"]
            .iter()
            .any(|key| self.request_type_for(key) == Some(request_type_id))
        {
            Priority::Normal
        } else {
            Priority::High
        }
    }
}
