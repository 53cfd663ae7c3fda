use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HooksError, Result};
use crate::git::METADATA_DIR;

/// Managed hooks live in `<hooks dir>/<hook>.d/`, one script per file
const SCRIPT_DIR_SUFFIX: &str = ".d";

/// Where hook scripts are looked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookLocations {
    /// `~/.git-hooks`
    pub global_dir: PathBuf,
    /// `<project>/.git-hooks`
    pub local_dir: PathBuf,
    /// `<project>/.husky`
    pub husky_dir: PathBuf,
    /// `$GIT_DIR`, `<project>/.git` when unset
    pub git_dir: PathBuf,
    /// `<git_dir>/hooks`
    pub standard_dir: PathBuf,
}

impl HookLocations {
    /// Locations for `project_dir`, honouring `$HOME` and `$GIT_DIR`.
    pub fn discover(project_dir: &Path) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| HooksError::Config("could not determine home directory".to_string()))?;
        let git_dir = std::env::var_os("GIT_DIR")
            .filter(|dir| !dir.is_empty())
            .map(|dir| project_dir.join(dir))
            .unwrap_or_else(|| project_dir.join(METADATA_DIR));

        Ok(Self::new(home.join(".git-hooks"), project_dir, &git_dir))
    }

    pub fn new(global_dir: PathBuf, project_dir: &Path, git_dir: &Path) -> Self {
        Self {
            global_dir,
            local_dir: project_dir.join(".git-hooks"),
            husky_dir: project_dir.join(".husky"),
            git_dir: git_dir.to_path_buf(),
            standard_dir: git_dir.join("hooks"),
        }
    }
}

/// Scripts installed for one hook in a `<hook>.d` directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookScripts {
    pub hook: &'static str,
    pub scripts: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HuskyFormat {
    /// `.husky/<hook>`
    New,
    /// `.husky/_/<hook>`
    Old,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HuskyHook {
    pub hook: &'static str,
    pub format: HuskyFormat,
}

/// Installed hooks by source. A `None` source means its directory does not
/// exist; `Some(vec![])` means it exists but holds no hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub global_dir: PathBuf,
    pub global: Option<Vec<HookScripts>>,
    pub local: Option<Vec<HookScripts>>,
    pub husky: Option<Vec<HuskyHook>>,
    pub standard: Option<Vec<&'static str>>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.global.as_ref().is_none_or(Vec::is_empty)
            && self.local.as_ref().is_none_or(Vec::is_empty)
            && self.husky.as_ref().is_none_or(Vec::is_empty)
            && self.standard.as_ref().is_none_or(Vec::is_empty)
    }
}

/// Collect the hooks from `hooks` installed at `locations`.
pub fn inventory(hooks: &[&'static str], locations: &HookLocations) -> Inventory {
    Inventory {
        global_dir: locations.global_dir.clone(),
        global: script_dirs(hooks, &locations.global_dir),
        local: script_dirs(hooks, &locations.local_dir),
        husky: husky_hooks(hooks, &locations.husky_dir),
        standard: standard_hooks(hooks, &locations.standard_dir),
    }
}

fn script_dirs(hooks: &[&'static str], base: &Path) -> Option<Vec<HookScripts>> {
    if !base.is_dir() {
        return None;
    }

    let found = hooks
        .iter()
        .filter_map(|&hook| {
            let scripts = list_scripts(&base.join(format!("{hook}{SCRIPT_DIR_SUFFIX}")));
            (!scripts.is_empty()).then_some(HookScripts { hook, scripts })
        })
        .collect();
    Some(found)
}

/// File names in `dir`, sorted; subdirectories are not scripts
fn list_scripts(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::trace!("No scripts in {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut scripts: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    scripts.sort();
    scripts
}

fn husky_hooks(hooks: &[&'static str], husky_dir: &Path) -> Option<Vec<HuskyHook>> {
    if !husky_dir.is_dir() {
        return None;
    }

    let found = hooks
        .iter()
        .filter_map(|&hook| {
            let new = husky_dir.join(hook).exists();
            let old = husky_dir.join("_").join(hook).exists();
            let format = match (new, old) {
                (true, true) => HuskyFormat::Both,
                (true, false) => HuskyFormat::New,
                (false, true) => HuskyFormat::Old,
                (false, false) => return None,
            };
            Some(HuskyHook { hook, format })
        })
        .collect();
    Some(found)
}

fn standard_hooks(hooks: &[&'static str], hooks_dir: &Path) -> Option<Vec<&'static str>> {
    if !hooks_dir.is_dir() {
        return None;
    }

    let found = hooks
        .iter()
        .copied()
        .filter(|hook| is_executable(&hooks_dir.join(hook)))
        .collect();
    Some(found)
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| is_executable_file(&m))
}

#[cfg(unix)]
pub(super) fn is_executable_file(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub(super) fn is_executable_file(metadata: &fs::Metadata) -> bool {
    metadata.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::GIT_HOOKS;
    use tempfile::TempDir;

    fn locations(temp_dir: &TempDir) -> HookLocations {
        let project = temp_dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        HookLocations::new(temp_dir.path().join("home/.git-hooks"), &project, &project.join(".git"))
    }

    #[test]
    fn test_nothing_installed() {
        let temp_dir = TempDir::new().unwrap();
        let found = inventory(GIT_HOOKS, &locations(&temp_dir));

        assert!(found.global.is_none());
        assert!(found.local.is_none());
        assert!(found.husky.is_none());
        assert!(found.standard.is_none());
        assert!(found.is_empty());
    }

    #[test]
    fn test_script_directories() {
        let temp_dir = TempDir::new().unwrap();
        let locations = locations(&temp_dir);
        let pre_commit = locations.global_dir.join("pre-commit.d");
        fs::create_dir_all(pre_commit.join("nested")).unwrap();
        fs::write(pre_commit.join("20-lint"), "#!/bin/sh\n").unwrap();
        fs::write(pre_commit.join("10-secrets"), "#!/bin/sh\n").unwrap();
        fs::create_dir_all(locations.global_dir.join("pre-push.d")).unwrap();
        fs::create_dir_all(locations.local_dir.join("commit-msg.d")).unwrap();
        fs::write(locations.local_dir.join("commit-msg.d/check"), "#!/bin/sh\n").unwrap();

        let found = inventory(GIT_HOOKS, &locations);

        assert_eq!(
            found.global,
            Some(vec![HookScripts {
                hook: "pre-commit",
                scripts: vec!["10-secrets".to_string(), "20-lint".to_string()],
            }])
        );
        assert_eq!(
            found.local,
            Some(vec![HookScripts {
                hook: "commit-msg",
                scripts: vec!["check".to_string()],
            }])
        );
        assert!(!found.is_empty());
    }

    #[test]
    fn test_husky_formats() {
        let temp_dir = TempDir::new().unwrap();
        let locations = locations(&temp_dir);
        fs::create_dir_all(locations.husky_dir.join("_")).unwrap();
        fs::write(locations.husky_dir.join("pre-commit"), "npx lint-staged\n").unwrap();
        fs::write(locations.husky_dir.join("_/commit-msg"), "").unwrap();
        fs::write(locations.husky_dir.join("pre-push"), "").unwrap();
        fs::write(locations.husky_dir.join("_/pre-push"), "").unwrap();

        let found = inventory(GIT_HOOKS, &locations);

        assert_eq!(
            found.husky,
            Some(vec![
                HuskyHook { hook: "pre-commit", format: HuskyFormat::New },
                HuskyHook { hook: "commit-msg", format: HuskyFormat::Old },
                HuskyHook { hook: "pre-push", format: HuskyFormat::Both },
            ])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_standard_hooks_must_be_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locations = locations(&temp_dir);
        fs::create_dir_all(&locations.standard_dir).unwrap();
        let hook = locations.standard_dir.join("pre-commit");
        fs::write(&hook, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(locations.standard_dir.join("pre-push.sample"), "#!/bin/sh\n").unwrap();
        fs::write(locations.standard_dir.join("commit-msg"), "#!/bin/sh\n").unwrap();
        fs::set_permissions(
            locations.standard_dir.join("commit-msg"),
            fs::Permissions::from_mode(0o644),
        )
        .unwrap();

        let found = inventory(GIT_HOOKS, &locations);
        assert_eq!(found.standard, Some(vec!["pre-commit"]));
    }
}
