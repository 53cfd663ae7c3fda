//! Layered configuration
//!
//! Settings are merged with figment, lowest priority first:
//!
//! 1. `default-config.toml`, embedded at compile time
//! 2. `~/.config/git-hooks/config.toml`
//! 3. `git-hooks.toml` in the project directory
//! 4. an explicit `--config FILE`, which replaces layers 2 and 3
//! 5. `GIT_HOOKS_*` environment variables, nested with `__`
//!    (`GIT_HOOKS_SCAN__MAX_DEPTH=4`)
//!
//! Command line flags are applied on top by the CLI.

pub mod core;

pub use core::{CleanMode, CleanSettings, ScanSettings, Settings, StoreSettings};
