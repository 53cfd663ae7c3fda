//! Batch removal of `core.hooksPath` overrides
//!
//! [`Cleaner`] runs the config store editor over a list of repositories,
//! sequentially or on a worker pool, and collects one [`CleanResult`] per
//! attempted repository in input order.
//!
//! Cancellation is checked before each repository. The repository that
//! observes it gets a [`HooksError::Cancelled`] result and nothing after it is
//! attempted, so a cancelled summary holds fewer results than repositories.
//! Edits already in flight on other workers finish atomically.

use serde::{Serialize, Serializer};

use crate::cancel::CancelToken;
use crate::error::HooksError;
use crate::git::{ConfigStore, Removal, Repository, StoreBackend};
use crate::parallel::{ExecutionStrategy, Step};

/// Outcome of attempting removal for one repository
#[derive(Debug, Serialize)]
pub struct CleanResult<'a> {
    pub repository: &'a Repository,
    /// The key is absent now, whether removed by this run or already gone
    pub removed: bool,
    /// Value present before the attempt, empty if none
    pub previous_value: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<HooksError>,
}

impl<'a> CleanResult<'a> {
    fn new(repository: &'a Repository) -> Self {
        Self {
            repository,
            removed: false,
            previous_value: repository.override_str().to_string(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.removed && self.error.is_none()
    }

    pub fn is_cancelled(&self) -> bool {
        self.error.as_ref().is_some_and(HooksError::is_cancelled)
    }
}

fn serialize_error<S: Serializer>(error: &Option<HooksError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Aggregate of a batch run
#[derive(Debug, Default, Serialize)]
pub struct CleanSummary<'a> {
    /// Repositories handed to the cleaner
    pub repositories_with_config: usize,
    /// Results with `removed == true` and no error
    pub configs_removed: usize,
    /// One entry per attempted repository, in input order
    pub results: Vec<CleanResult<'a>>,
}

impl<'a> CleanSummary<'a> {
    fn from_results(repositories_with_config: usize, results: Vec<CleanResult<'a>>) -> Self {
        let configs_removed = results.iter().filter(|r| r.is_success()).count();
        Self {
            repositories_with_config,
            configs_removed,
            results,
        }
    }

    /// Results carrying an error other than cancellation
    pub fn failures(&self) -> impl Iterator<Item = &CleanResult<'a>> {
        self.results
            .iter()
            .filter(|r| r.error.is_some() && !r.is_cancelled())
    }

    pub fn was_cancelled(&self) -> bool {
        self.results.iter().any(CleanResult::is_cancelled)
    }

    /// Repositories never reached because the run was cancelled
    pub fn not_attempted(&self) -> usize {
        self.repositories_with_config - self.results.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.configs_removed == self.repositories_with_config
    }
}

pub struct Cleaner<'s> {
    store: &'s dyn ConfigStore,
    strategy: ExecutionStrategy,
    cancel: CancelToken,
}

impl Default for Cleaner<'static> {
    fn default() -> Self {
        Self::new(StoreBackend::default().store())
    }
}

impl<'s> Cleaner<'s> {
    pub fn new(store: &'s dyn ConfigStore) -> Self {
        Self {
            store,
            strategy: ExecutionStrategy::Sequential,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn clean<'a>(&self, repositories: &'a [Repository]) -> CleanSummary<'a> {
        self.clean_with(repositories, |_| {})
    }

    /// Like [`Cleaner::clean`], calling `observer` as each result is recorded.
    ///
    /// Under a parallel strategy the observer runs on worker threads and sees
    /// results in completion order; the summary is still in input order.
    pub fn clean_with<'a, O>(&self, repositories: &'a [Repository], observer: O) -> CleanSummary<'a>
    where
        O: Fn(&CleanResult<'a>) + Sync,
    {
        tracing::debug!(
            "Cleaning {} repositories ({:?}, {} store)",
            repositories.len(),
            self.strategy,
            self.store.name()
        );

        let results = self.strategy.execute(
            repositories,
            |repository, _worker_id| {
                let result = self.clean_one(repository);
                observer(&result);
                if result.is_cancelled() {
                    Step::Halt(result)
                } else {
                    Step::Continue(result)
                }
            },
            None::<fn(usize, usize, usize)>,
        );

        CleanSummary::from_results(repositories.len(), results)
    }

    fn clean_one<'a>(&self, repository: &'a Repository) -> CleanResult<'a> {
        let mut result = CleanResult::new(repository);

        if let Err(e) = self.cancel.check() {
            tracing::debug!("Cancelled before {}", repository.path.display());
            result.error = Some(e);
            return result;
        }

        match self.store.remove_override(repository) {
            Ok(Removal::Removed) => {
                tracing::info!("Removed core.hooksPath from {}", repository.path.display());
                result.removed = true;
            }
            Ok(Removal::AlreadyAbsent) => {
                tracing::debug!("core.hooksPath already absent in {}", repository.path.display());
                result.removed = true;
            }
            Err(e) => {
                tracing::warn!("Failed to clean {}: {}", repository.path.display(), e);
                result.error = Some(e);
            }
        }

        result
    }
}

/// Clean `repositories` sequentially with the default text store.
pub fn clean<'a>(repositories: &'a [Repository], cancel: &CancelToken) -> CleanSummary<'a> {
    Cleaner::default().with_cancel(cancel.clone()).clean(repositories)
}

/// [`clean`] with a per-result observer, e.g. for progress display.
pub fn clean_with<'a, O>(repositories: &'a [Repository], cancel: &CancelToken, observer: O) -> CleanSummary<'a>
where
    O: Fn(&CleanResult<'a>) + Sync,
{
    Cleaner::default()
        .with_cancel(cancel.clone())
        .clean_with(repositories, observer)
}
