//! Error types for repository discovery and hook-override cleanup

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HooksError>;

#[derive(Error, Debug)]
pub enum HooksError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read git config {}: {source}", .path.display())]
    StoreRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write git config {}: {source}", .path.display())]
    StoreWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read global git config: {0}")]
    GlobalConfig(#[from] git2::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl HooksError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HooksError::Cancelled)
    }
}
