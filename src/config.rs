use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SyncError, SyncResult};
use crate::mapping::LabelMaps;

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone)]
pub struct ClickUpConfig {
    pub api_key: String,
    pub list_id: String,
    pub space_id: Option<String>,
    /// When unset, the id is discovered from the space's custom fields at
    /// the start of the run.
    pub request_type_field_id: Option<String>,
}

/// Immutable configuration for one sync run, resolved once at startup and
/// passed into the orchestrator.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub github: GitHubConfig,
    pub clickup: ClickUpConfig,
    pub slack_webhook_url: Option<String>,
    pub maps: LabelMaps,
    /// Mark tasks complete when their issue no longer exists upstream.
    pub close_missing: bool,
    /// Mirror GitHub issue comments onto the matching task.
    pub mirror_comments: bool,
}

/// Optional map overrides read from the JSON config file. Each map, when
/// present, replaces the built-in defaults wholesale.
#[derive(Debug, Default, Deserialize)]
struct MapOverrides {
    label_to_request_type_id: Option<HashMap<String, String>>,
    label_to_priority: Option<HashMap<String, u8>>,
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ghcu-sync")
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.json")
}

impl SyncConfig {
    /// Read credentials and ids from the environment and label maps from the
    /// JSON config file (missing file means built-in maps).
    pub fn load(config_path: Option<&Path>) -> SyncResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), config_path)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        config_path: Option<&Path>,
    ) -> SyncResult<Self> {
        let github = GitHubConfig {
            token: require(&lookup, "github_personal_access_token")?,
            owner: require(&lookup, "github_owner")?,
            repo: require(&lookup, "github_repo")?,
        };

        let clickup = ClickUpConfig {
            api_key: require(&lookup, "clickup_api_key")?,
            list_id: require(&lookup, "clickup_list_id")?,
            space_id: lookup("clickup_space_id").filter(|v| !v.is_empty()),
            request_type_field_id: lookup("request_type_custom_field_id")
                .filter(|v| !v.is_empty()),
        };

        if clickup.space_id.is_none() && clickup.request_type_field_id.is_none() {
            return Err(SyncError::Configuration(
                "set request_type_custom_field_id, or clickup_space_id so the field \
                 can be discovered"
                    .into(),
            ));
        }

        let overrides = load_overrides(config_path)?;
        let maps = LabelMaps::new(
            overrides.label_to_request_type_id,
            overrides.label_to_priority,
        )?;

        Ok(Self {
            github,
            clickup,
            slack_webhook_url: lookup("slack_webhook_url").filter(|v| !v.is_empty()),
            maps,
            close_missing: false,
            mirror_comments: false,
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> SyncResult<String> {
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SyncError::Configuration(format!("missing environment variable {key}")))
}

fn load_overrides(config_path: Option<&Path>) -> SyncResult<MapOverrides> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    };
    // An explicitly requested file must exist; the default path is optional.
    if !path.exists() {
        if config_path.is_some() {
            return Err(SyncError::Configuration(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(MapOverrides::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_json::from_str(&contents).map_err(|err| {
        SyncError::Configuration(format!("failed to parse {}: {err}", path.display()))
    })
}
