//! Generic parallel execution framework
//!
//! The module owns system resource management and the execution strategy:
//! core detection through `num_cpus::get()`, applying the configured thread
//! percentage and cap, and running a processor over a slice either on the
//! calling thread or on a crossbeam worker pool.
//!
//! It knows nothing about repositories. Callers decide how many items make a
//! pool worthwhile and what halting means for their work.
//!
//! # Example Usage
//!
//! ```rust
//! use git_hooks::parallel::{ExecutionStrategy, Step};
//!
//! let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
//! let strategy = ExecutionStrategy::auto(100, 8, workers);
//!
//! let items = vec![1, 2, 3];
//! let doubled = strategy.execute(&items, |n, _worker_id| Step::Continue(n * 2), None::<fn(usize, usize, usize)>);
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```

pub mod core;

// Re-export main types for easier access
pub use core::{ExecutionStrategy, Step};
