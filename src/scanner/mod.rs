//! Repository discovery
//!
//! [`Scanner`] drives a [`TreeWalker`] over a directory tree and returns the
//! repositories whose local config overrides `core.hooksPath`.

pub mod directory;
pub mod walker;

use std::path::Path;

pub use directory::{SKIPPED_DIRECTORIES, SkippedDirectories};
pub use walker::TreeWalker;

use crate::cancel::CancelToken;
use crate::error::{HooksError, Result};
use crate::git::{ConfigStore, Repository, StoreBackend};

/// Default walk depth when neither the CLI nor configuration sets one
pub const DEFAULT_MAX_DEPTH: usize = 10;

#[derive(Clone)]
pub struct Scanner<'a> {
    max_depth: usize,
    store: &'a dyn ConfigStore,
    cancel: CancelToken,
}

impl Default for Scanner<'static> {
    fn default() -> Self {
        Self::new(StoreBackend::default().store())
    }
}

impl<'a> Scanner<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            store,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Every repository under `root`, with or without an override, in
    /// discovery order.
    pub fn discover(&self, root: &Path) -> Result<Vec<Repository>> {
        let root = std::path::absolute(root).map_err(|source| HooksError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        let mut repositories = Vec::new();
        TreeWalker::new(self.max_depth, self.store, self.cancel.clone())
            .walk(&root, |repository| repositories.push(repository))?;

        tracing::debug!(
            "Discovered {} repositories under {} using the {} store",
            repositories.len(),
            root.display(),
            self.store.name()
        );
        Ok(repositories)
    }

    /// Repositories under `root` whose config sets `core.hooksPath`.
    ///
    /// A cancelled walk returns [`HooksError::Cancelled`] and no partial list.
    pub fn scan(&self, root: &Path) -> Result<Vec<Repository>> {
        let repositories = self.discover(root)?;
        Ok(repositories
            .into_iter()
            .filter(Repository::has_override)
            .collect())
    }
}

/// Scan `root` with the default text store.
pub fn scan(root: &Path, max_depth: usize, cancel: &CancelToken) -> Result<Vec<Repository>> {
    Scanner::default()
        .with_max_depth(max_depth)
        .with_cancel(cancel.clone())
        .scan(root)
}
