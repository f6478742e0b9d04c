use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to load geometry: {0}")]
    GeometryLoad(String),

    #[error("failed to load config from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A page that could not be processed. The rest of the document continues;
/// the failure is carried in the report instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFailure {
    pub page_index: usize,
    pub reason: String,
}

impl PageFailure {
    pub fn new(page_index: usize, reason: impl Into<String>) -> Self {
        Self {
            page_index,
            reason: reason.into(),
        }
    }
}
