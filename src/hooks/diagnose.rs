use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::inventory::is_executable_file;
use super::{HookLocations, is_known_hook};

/// Metadata of a hook file that exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Permission bits such as `0o755`; `None` off unix
    pub mode: Option<u32>,
    pub size: u64,
    pub executable: bool,
}

impl FileInfo {
    /// `None` when `path` does not exist or cannot be inspected
    pub fn read(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            mode: permission_bits(&metadata),
            size: metadata.len(),
            executable: is_executable_file(&metadata),
        })
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(_metadata: &fs::Metadata) -> Option<u32> {
    None
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    pub name: String,
    #[serde(flatten)]
    pub info: FileInfo,
}

/// A `<hook>.d` directory; `scripts` is `None` when the directory is missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptDir {
    pub path: PathBuf,
    pub scripts: Option<Vec<Script>>,
}

impl ScriptDir {
    fn read(path: PathBuf) -> Self {
        let scripts = fs::read_dir(&path).ok().map(|entries| {
            let mut scripts: Vec<Script> = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
                .filter_map(|entry| {
                    Some(Script {
                        name: entry.file_name().to_string_lossy().into_owned(),
                        info: FileInfo::read(&entry.path())?,
                    })
                })
                .collect();
            scripts.sort_by(|a, b| a.name.cmp(&b.name));
            scripts
        });
        Self { path, scripts }
    }
}

/// A single hook file; `file` is `None` when it does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookFile {
    pub path: PathBuf,
    pub file: Option<FileInfo>,
}

impl HookFile {
    fn read(path: PathBuf) -> Self {
        let file = FileInfo::read(&path);
        Self { path, file }
    }
}

/// Everything that could run for one hook, by source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookReport {
    pub hook: String,
    /// Whether git ever invokes a hook by this name
    pub known: bool,
    pub global: ScriptDir,
    pub local: ScriptDir,
    pub husky_new: HookFile,
    pub husky_old: HookFile,
    pub standard: HookFile,
}

pub fn diagnose_hook(hook: &str, locations: &HookLocations) -> HookReport {
    let script_dir = format!("{hook}.d");
    HookReport {
        hook: hook.to_string(),
        known: is_known_hook(hook),
        global: ScriptDir::read(locations.global_dir.join(&script_dir)),
        local: ScriptDir::read(locations.local_dir.join(&script_dir)),
        husky_new: HookFile::read(locations.husky_dir.join(hook)),
        husky_old: HookFile::read(locations.husky_dir.join("_").join(hook)),
        standard: HookFile::read(locations.standard_dir.join(hook)),
    }
}

/// Dispatcher script installed directly in the global hooks directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalHook {
    pub hook: &'static str,
    #[serde(flatten)]
    pub info: FileInfo,
}

/// State of the global hooks setup as seen from one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    /// `core.hooksPath` from the user's global git config
    pub global_hooks_path: Option<String>,
    pub global_dir: PathBuf,
    pub global_dir_exists: bool,
    pub global_hooks: Vec<GlobalHook>,
    pub git_dir: PathBuf,
    pub is_repository: bool,
}

pub fn diagnose_setup(
    hooks: &[&'static str],
    locations: &HookLocations,
    global_hooks_path: Option<String>,
) -> SetupReport {
    let global_hooks = hooks
        .iter()
        .filter_map(|&hook| {
            let info = FileInfo::read(&locations.global_dir.join(hook))?;
            Some(GlobalHook { hook, info })
        })
        .collect();

    SetupReport {
        global_hooks_path,
        global_dir: locations.global_dir.clone(),
        global_dir_exists: locations.global_dir.is_dir(),
        global_hooks,
        git_dir: locations.git_dir.clone(),
        is_repository: locations.git_dir.is_dir(),
    }
}
