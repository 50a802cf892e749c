//! Scene feed errors.

use std::path::PathBuf;

/// Errors that can occur while loading the scene library.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid scene data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate scene id '{0}'")]
    DuplicateId(String),

    #[error("Scene '{id}' has invalid duration {duration}")]
    InvalidDuration { id: String, duration: f64 },
}
