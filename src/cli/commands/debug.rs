use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{CommandContext, print_json};
use crate::cli::output::Output;
use crate::git;
use crate::hooks::{self, FileInfo, GIT_HOOKS, HookFile, HookLocations, ScriptDir};

#[derive(Args)]
pub struct DebugArgs {
    #[command(subcommand)]
    pub command: DebugCommand,

    /// Global hooks directory (defaults to ~/.git-hooks)
    #[arg(long, value_name = "DIR", global = true)]
    pub global_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum DebugCommand {
    /// Show every place a hook is looked up and what is installed there
    Hook {
        /// Hook name, e.g. pre-commit
        name: String,
    },
    /// Show the global hooks setup and the global core.hooksPath
    Config,
}

pub fn execute(args: DebugArgs, project_dir: &Path, ctx: &CommandContext) -> Result<ExitCode> {
    let mut locations =
        HookLocations::discover(project_dir).context("Failed to locate hook directories")?;
    if let Some(global_dir) = args.global_dir {
        locations.global_dir = global_dir;
    }

    match args.command {
        DebugCommand::Hook { name } => debug_hook(&name, &locations, ctx)?,
        DebugCommand::Config => debug_config(&locations, ctx)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn debug_hook(name: &str, locations: &HookLocations, ctx: &CommandContext) -> Result<()> {
    let report = hooks::diagnose_hook(name, locations);
    if ctx.is_json() {
        return print_json(&report);
    }

    let output = &ctx.output;
    output.header(&format!("Debugging hook: {name}"));
    if !report.known {
        output.warning(&format!("'{name}' is not a hook git runs"));
    }

    output.section_header(&format!("1. Global hooks directory: {}", report.global.path.display()));
    print_script_dir(output, &report.global);

    output.section_header(&format!("2. Local hooks directory: {}", report.local.path.display()));
    print_script_dir(output, &report.local);

    output.section_header("3. Husky hooks");
    output.list_item(&format!("New format: {}", report.husky_new.path.display()));
    output.indent(&describe(&report.husky_new));
    output.list_item(&format!("Old format: {}", report.husky_old.path.display()));
    output.indent(&describe(&report.husky_old));

    output.section_header(&format!("4. Standard git hook: {}", report.standard.path.display()));
    output.indent(&describe(&report.standard));
    Ok(())
}

fn debug_config(locations: &HookLocations, ctx: &CommandContext) -> Result<()> {
    let global_hooks_path = git::global_hooks_path().context("Failed to read global git configuration")?;
    let report = hooks::diagnose_setup(GIT_HOOKS, locations, global_hooks_path);
    if ctx.is_json() {
        return print_json(&report);
    }

    let output = &ctx.output;
    output.header("Git hooks configuration");

    output.section_header("1. Global git configuration");
    match &report.global_hooks_path {
        Some(path) => output.info(&format!("core.hooksPath = {path}")),
        None => output.warning("core.hooksPath is not set globally"),
    }

    output.section_header(&format!("2. Global hooks directory: {}", report.global_dir.display()));
    if report.global_dir_exists {
        output.success("Directory exists");
        for hook in &report.global_hooks {
            output.list_item(&format!("{}: {}", hook.hook, file_summary(&hook.info)));
        }
    } else {
        output.warning("Directory not found");
    }

    output.section_header("3. Current repository");
    if let Some(git_dir) = std::env::var_os("GIT_DIR").filter(|dir| !dir.is_empty()) {
        output.info(&format!("GIT_DIR = {}", Path::new(&git_dir).display()));
    }
    if report.is_repository {
        output.success(&format!("Git repository detected at {}", report.git_dir.display()));
    } else {
        output.warning(&format!("No git directory at {}", report.git_dir.display()));
    }
    Ok(())
}

fn print_script_dir(output: &Output, dir: &ScriptDir) {
    match &dir.scripts {
        Some(scripts) => {
            output.indent(&format!("Found {} file(s)", scripts.len()));
            for script in scripts {
                output.list_item(&format!("{} ({})", script.name, file_summary(&script.info)));
            }
        }
        None => output.indent("Not found"),
    }
}

fn describe(file: &HookFile) -> String {
    match &file.file {
        Some(info) => format!("Found: {}", file_summary(info)),
        None => "Not found".to_string(),
    }
}

fn file_summary(info: &FileInfo) -> String {
    let mode = info.mode.map(|mode| format!("mode {mode:o}, ")).unwrap_or_default();
    let status = if info.executable { "executable" } else { "not executable" };
    format!("{mode}{} bytes, {status}", info.size)
}
