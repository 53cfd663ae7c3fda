//! Git integration layer
//!
//! Repository detection and access to the per-repository config store
//! (`.git/config`). Only the `core.hooksPath` override is ever mutated; see
//! [`store`] for the two interchangeable backends. The global value is only
//! ever read, for diagnostics.

mod global;
pub mod repository;
pub mod store;

pub use global::global_hooks_path;
pub use repository::{CONFIG_FILE, METADATA_DIR, Repository, detect};
pub use store::{ConfigStore, LibGitStore, Removal, StoreBackend, TextStore};
