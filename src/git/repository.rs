use serde::Serialize;
use std::path::{Path, PathBuf};

use super::store::ConfigStore;

/// Name of the metadata subdirectory that marks a repository root
pub const METADATA_DIR: &str = ".git";

/// Location of the config store, relative to the metadata subdirectory
pub const CONFIG_FILE: &str = "config";

/// A detected repository root and the state of its `core.hooksPath` override
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Absolute path of the working tree root
    pub path: PathBuf,
    /// `<path>/.git`
    pub metadata_dir: PathBuf,
    /// `<path>/.git/config`
    pub config_path: PathBuf,
    /// Value of `core.hooksPath`, when set to a non-empty value
    pub override_value: Option<String>,
}

impl Repository {
    /// Build a record for `path` without consulting the config store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let metadata_dir = path.join(METADATA_DIR);
        let config_path = metadata_dir.join(CONFIG_FILE);
        Self {
            path,
            metadata_dir,
            config_path,
            override_value: None,
        }
    }

    pub fn with_override(mut self, value: impl Into<String>) -> Self {
        self.override_value = Some(value.into());
        self
    }

    pub fn has_override(&self) -> bool {
        self.override_value.is_some()
    }

    /// The override value, or `""` when none is set
    pub fn override_str(&self) -> &str {
        self.override_value.as_deref().unwrap_or_default()
    }
}

/// Whether `path` contains a metadata subdirectory
pub fn is_repository_root(path: &Path) -> bool {
    path.join(METADATA_DIR).is_dir()
}

/// Detect a repository rooted at `path` and read its override.
///
/// Returns `None` when `path` is not a repository root. A missing or
/// unreadable config store never fails detection; it simply yields a
/// repository without an override.
pub fn detect(path: &Path, store: &dyn ConfigStore) -> Option<Repository> {
    if !is_repository_root(path) {
        return None;
    }

    let mut repo = Repository::new(path);
    match store.read_override(&repo.config_path) {
        Ok(value) => repo.override_value = value.filter(|v| !v.is_empty()),
        Err(e) => tracing::debug!("Ignoring unreadable config for {}: {}", path.display(), e),
    }

    Some(repo)
}
