use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::directory::SKIPPED_DIRECTORIES;
use crate::cancel::CancelToken;
use crate::error::{HooksError, Result};
use crate::git::{ConfigStore, Repository, detect};

/// Depth-bounded, cancellation-aware directory walker.
///
/// Traversal uses an explicit stack of `(directory, depth)` entries, so deep
/// trees never grow the call stack. Siblings are visited in file-name order,
/// depth first, which makes discovery order stable for a given tree.
///
/// - `root` is depth 0; directories deeper than `max_depth` are never opened.
/// - Directories named in [`SKIPPED_DIRECTORIES`] are neither opened nor
///   descended into.
/// - A repository root is reported once and never descended into, which
///   keeps the walker out of `.git` and out of nested checkouts.
/// - Symlinked directories are not followed.
/// - Permission errors while listing a directory skip that directory; any
///   other I/O error aborts the walk.
pub struct TreeWalker<'a> {
    max_depth: usize,
    store: &'a dyn ConfigStore,
    cancel: CancelToken,
}

impl<'a> TreeWalker<'a> {
    pub fn new(max_depth: usize, store: &'a dyn ConfigStore, cancel: CancelToken) -> Self {
        Self {
            max_depth,
            store,
            cancel,
        }
    }

    /// Walk `root`, calling `on_repository` for every repository root found.
    pub fn walk<F>(&self, root: &Path, mut on_repository: F) -> Result<()>
    where
        F: FnMut(Repository),
    {
        let mut pending: Vec<(PathBuf, usize)> = vec![(root.to_path_buf(), 0)];

        while let Some((dir, depth)) = pending.pop() {
            self.cancel.check()?;

            if is_skipped(&dir) {
                tracing::debug!("Skipping excluded directory {}", dir.display());
                continue;
            }

            tracing::trace!("Visiting {} (depth {})", dir.display(), depth);

            if let Some(repository) = detect(&dir, self.store) {
                tracing::debug!(
                    "Found repository {} (hooksPath: {})",
                    repository.path.display(),
                    repository.override_value.as_deref().unwrap_or("<unset>")
                );
                on_repository(repository);
                continue;
            }

            if depth >= self.max_depth {
                continue;
            }

            let children = match list_subdirectories(&dir) {
                Ok(children) => children,
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    tracing::warn!("Permission denied, skipping {}", dir.display());
                    continue;
                }
                Err(source) => return Err(HooksError::Walk { path: dir, source }),
            };

            // Reversed so the first sibling is popped first
            pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }

        Ok(())
    }
}

fn is_skipped(dir: &Path) -> bool {
    dir.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| SKIPPED_DIRECTORIES.contains(name))
}

/// Subdirectories of `dir`, sorted by name. `file_type` does not follow
/// symlinks, so linked directories are left out.
fn list_subdirectories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            children.push(entry.path());
        }
    }
    children.sort();
    Ok(children)
}
