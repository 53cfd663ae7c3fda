use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HooksError, Result};
use crate::git::StoreBackend;
use crate::parallel::ExecutionStrategy;
use crate::scanner::DEFAULT_MAX_DEPTH;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const PROJECT_CONFIG: &str = "git-hooks.toml";
const ENV_PREFIX: &str = "GIT_HOOKS_";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub scan: ScanSettings,
    pub store: StoreSettings,
    pub clean: CleanSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    pub max_depth: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanMode {
    Sequential,
    Parallel,
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanSettings {
    pub mode: CleanMode,
    pub max_threads: usize,
    pub thread_percentage: u8,
    pub min_repos_for_parallel: usize,
}

impl Default for CleanSettings {
    fn default() -> Self {
        Self {
            mode: CleanMode::Auto,
            max_threads: 0,
            thread_percentage: 75,
            min_repos_for_parallel: 8,
        }
    }
}

impl CleanSettings {
    /// Execution strategy for a batch of `repository_count` repositories
    pub fn strategy(&self, repository_count: usize) -> ExecutionStrategy {
        let workers =
            ExecutionStrategy::calculate_optimal_workers(self.max_threads, self.thread_percentage);

        match self.mode {
            CleanMode::Sequential => ExecutionStrategy::Sequential,
            CleanMode::Parallel => ExecutionStrategy::Parallel { workers },
            CleanMode::Auto => {
                ExecutionStrategy::auto(repository_count, self.min_repos_for_parallel, workers)
            }
        }
    }
}

impl Settings {
    /// Load settings for `project_dir`, optionally from an explicit file.
    pub fn load(project_dir: &Path, custom_config: Option<&Path>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");
        let settings: Settings = Self::figment(project_dir, custom_config)?
            .extract()
            .map_err(|e| HooksError::Config(e.to_string()))?;
        settings.validate()?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn figment(project_dir: &Path, custom_config: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        if let Some(custom_path) = custom_config {
            // A missing explicit file is a user error, unlike the optional layers
            if !custom_path.is_file() {
                return Err(HooksError::Config(format!(
                    "config file not found: {}",
                    custom_path.display()
                )));
            }
            figment = figment.merge(Toml::file(custom_path));
        } else {
            if let Some(user_config) = Self::user_config_path() {
                figment = figment.merge(Toml::file(user_config));
            }
            figment = figment.merge(Toml::file(project_dir.join(PROJECT_CONFIG)));
        }

        // Environment variables always have highest priority
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/git-hooks/config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.clean.thread_percentage) {
            return Err(HooksError::Config(format!(
                "clean.thread_percentage must be between 1 and 100, got {}",
                self.clean.thread_percentage
            )));
        }
        Ok(())
    }
}
