use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("Invalid version label: {message}")]
    InvalidVersion { message: String },

    #[error("Version '{0}' already exists")]
    VersionExists(String),

    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Target directory already exists: {path}")]
    TargetExists { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Sidebar error in {path}: {message}")]
    Sidebar { path: PathBuf, message: String },

    #[error("Version command failed: {0}")]
    VersionCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnapError>;
