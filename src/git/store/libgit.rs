use git2::{Config, ErrorCode};
use std::io;
use std::path::Path;

use super::{ConfigStore, OVERRIDE_KEY, OVERRIDE_SECTION, Removal, TextStore};
use crate::error::{HooksError, Result};
use crate::git::Repository;

/// libgit2's config engine, opened on the repository's local file only
#[derive(Debug, Clone, Copy, Default)]
pub struct LibGitStore;

impl LibGitStore {
    fn open(config_path: &Path) -> Result<Config> {
        // libgit2 happily opens a missing file as an empty config
        if !config_path.is_file() {
            return Err(HooksError::StoreRead {
                path: config_path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
            });
        }

        Config::open(config_path).map_err(|e| HooksError::StoreRead {
            path: config_path.to_path_buf(),
            source: io::Error::other(e),
        })
    }

    /// Re-read the file from disk and report whether any entry remains
    fn is_set(config_path: &Path) -> Result<bool> {
        let config = Self::open(config_path)?;
        Ok(!override_entries(&config, config_path)?.is_empty())
    }
}

fn override_name() -> String {
    format!("{OVERRIDE_SECTION}.{OVERRIDE_KEY}")
}

/// Anchored pattern for the normalized (lowercase) entry name
fn override_pattern() -> String {
    format!("^{}\\.{}$", OVERRIDE_SECTION, OVERRIDE_KEY.to_ascii_lowercase())
}

/// Every `core.hooksPath` entry in file order; `None` marks a bare `hooksPath`
/// line, which git reads as boolean true.
fn override_entries(config: &Config, config_path: &Path) -> Result<Vec<Option<String>>> {
    let read_err = |e: git2::Error| HooksError::StoreRead {
        path: config_path.to_path_buf(),
        source: io::Error::other(e),
    };

    let mut entries = config.entries(Some(&override_pattern())).map_err(read_err)?;
    let mut values = Vec::new();
    while let Some(entry) = entries.next() {
        let entry = entry.map_err(read_err)?;
        values.push(
            entry
                .has_value()
                .then(|| String::from_utf8_lossy(entry.value_bytes()).into_owned()),
        );
    }
    Ok(values)
}

impl ConfigStore for LibGitStore {
    fn name(&self) -> &'static str {
        "libgit2"
    }

    fn read_override(&self, config_path: &Path) -> Result<Option<String>> {
        let config = Self::open(config_path)?;
        match config.get_string(&override_name()) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(HooksError::StoreRead {
                path: config_path.to_path_buf(),
                source: io::Error::other(e),
            }),
        }
    }

    fn remove_override(&self, repository: &Repository) -> Result<Removal> {
        let config_path = &repository.config_path;
        let mut config = Self::open(config_path)?;

        let entries = override_entries(&config, config_path)?;
        if entries.is_empty() {
            return Ok(Removal::AlreadyAbsent);
        }

        if entries.iter().any(Option::is_none) {
            // libgit2 crashes matching a multivar regex against a value-less entry
            tracing::debug!("Bare hooksPath in {}, removing line by line", config_path.display());
            TextStore.remove_override(repository)?;
        } else {
            // A multivar regex of `.*` drops every occurrence in one locked write
            match config.remove_multivar(&override_name(), ".*") {
                Ok(()) => {}
                Err(e) if e.code() == ErrorCode::NotFound => {}
                Err(e) => {
                    return Err(HooksError::StoreWrite {
                        path: config_path.to_path_buf(),
                        source: io::Error::other(e),
                    });
                }
            }
        }
        drop(config);

        // libgit2 leaves a key sharing its line with the section header in place
        if Self::is_set(config_path)? {
            TextStore.remove_override(repository)?;
            if Self::is_set(config_path)? {
                return Err(HooksError::StoreWrite {
                    path: config_path.to_path_buf(),
                    source: io::Error::other("core.hooksPath is still set after removal"),
                });
            }
        }

        Ok(Removal::Removed)
    }
}
