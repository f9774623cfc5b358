use thiserror::Error;

/// Errors surfaced by the sync pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A non-2xx response from GitHub, ClickUp, or Slack. Carries the raw
    /// response body so the diagnostic is actionable without a re-run.
    #[error("{service} returned {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Missing or invalid credentials, ids, or list setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A response payload was missing a field the sync cannot default.
    #[error("unexpected {service} payload: {detail}")]
    Data {
        service: &'static str,
        detail: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
