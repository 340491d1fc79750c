// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Malformed notebook {path}: {reason}")]
    Notebook { path: PathBuf, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generic error: {0}")]
    Other(String),
}

impl CloneError {
    /// Wraps an I/O error together with the path that caused it.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloneError>;

// Allow `?` on std::io::Error by converting to CloneError::Io with unknown path.
impl From<std::io::Error> for CloneError {
    fn from(source: std::io::Error) -> Self {
        CloneError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for CloneError {
    fn from(e: walkdir::Error) -> Self {
        CloneError::Other(e.to_string())
    }
}

impl From<toml::de::Error> for CloneError {
    fn from(e: toml::de::Error) -> Self {
        CloneError::Config(e.to_string())
    }
}
