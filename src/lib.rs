//! # git-hooks
//!
//! Globally managed git hooks only run when a repository does not redirect
//! them. A local `core.hooksPath` in `.git/config`, typically left behind by
//! Husky or a similar tool, silently disables every global hook for that
//! repository.
//!
//! This crate finds those repositories and removes exactly that one setting:
//!
//! - [`scanner`] walks a directory tree, bounded in depth and skipping
//!   dependency and virtualenv directories, and reports repositories whose
//!   local config sets `core.hooksPath`.
//! - [`cleaner`] removes the override from each repository, leaving every
//!   other line of the config byte-for-byte intact.
//! - [`git::store`] holds the two interchangeable config backends.
//!
//! ```no_run
//! use git_hooks::{CancelToken, cleaner, scanner};
//! use std::path::Path;
//!
//! let cancel = CancelToken::new();
//! let repositories = scanner::scan(Path::new("."), 10, &cancel)?;
//! let summary = cleaner::clean(&repositories, &cancel);
//! println!("removed {} of {}", summary.configs_removed, summary.repositories_with_config);
//! # Ok::<(), git_hooks::HooksError>(())
//! ```

pub mod cancel;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hooks;
pub mod parallel;
pub mod scanner;

pub use cancel::CancelToken;
pub use cleaner::{CleanResult, CleanSummary, Cleaner};
pub use cli::{Cli, Output};
pub use config::Settings;
pub use error::{HooksError, Result};
pub use git::{ConfigStore, LibGitStore, Repository, StoreBackend, TextStore};
pub use scanner::Scanner;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
