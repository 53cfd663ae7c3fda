//! Access to a repository's config store
//!
//! Two backends implement [`ConfigStore`] and must agree on every input:
//!
//! - [`TextStore`] parses `.git/config` line by line, tracking the current
//!   section, and rewrites the file with the matching lines dropped.
//! - [`LibGitStore`] hands the file to libgit2's config engine, opened on the
//!   local file only so global and system scopes are never consulted.
//!
//! Both only recognise `hooksPath` inside a plain `[core]` header. A key in
//! `[core "sub"]`, `[custom "core"]` or any other section is ignored.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Repository;
use crate::error::Result;

mod libgit;
mod text;

pub use libgit::LibGitStore;
pub use text::TextStore;

/// Section holding the override
pub const OVERRIDE_SECTION: &str = "core";

/// Key name of the override inside [`OVERRIDE_SECTION`]
pub const OVERRIDE_KEY: &str = "hooksPath";

/// Outcome of a successful removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// At least one `hooksPath` line was dropped
    Removed,
    /// The key was not set; the store was left untouched
    AlreadyAbsent,
}

pub trait ConfigStore: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Read `core.hooksPath` from the store at `config_path`.
    ///
    /// `Ok(None)` means the key is not set. When set more than once, the last
    /// occurrence wins.
    fn read_override(&self, config_path: &Path) -> Result<Option<String>>;

    /// Remove every `core.hooksPath` entry from the repository's store,
    /// leaving all other lines intact.
    fn remove_override(&self, repository: &Repository) -> Result<Removal>;
}

/// Selectable backend, as named in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Text,
    Libgit2,
}

static TEXT_STORE: TextStore = TextStore;
static LIBGIT_STORE: LibGitStore = LibGitStore;

impl StoreBackend {
    pub fn store(self) -> &'static dyn ConfigStore {
        match self {
            StoreBackend::Text => &TEXT_STORE,
            StoreBackend::Libgit2 => &LIBGIT_STORE,
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.store().name())
    }
}
