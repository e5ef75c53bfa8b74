use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to parse API model: {0}")]
    InvalidModel(serde_json::Error),

    #[error("JSON serialization failed: {0}")]
    Serialize(serde_json::Error),

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GenerateError>;
