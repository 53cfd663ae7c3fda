use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{CommandContext, print_json};
use crate::hooks::{self, GIT_HOOKS, HookLocations, HookScripts, HuskyFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Global hooks directory (defaults to ~/.git-hooks)
    #[arg(long, value_name = "DIR")]
    pub global_dir: Option<PathBuf>,
}

pub fn execute(args: ListArgs, project_dir: &Path, ctx: &CommandContext) -> Result<ExitCode> {
    let mut locations =
        HookLocations::discover(project_dir).context("Failed to locate hook directories")?;
    if let Some(global_dir) = args.global_dir {
        locations.global_dir = global_dir;
    }

    let inventory = hooks::inventory(GIT_HOOKS, &locations);
    if ctx.is_json() {
        print_json(&inventory)?;
        return Ok(ExitCode::SUCCESS);
    }

    let output = &ctx.output;
    output.header("Installed Git Hooks");

    output.section_header(&format!("Global hooks directory: {}", inventory.global_dir.display()));
    match &inventory.global {
        Some(found) => print_scripts(ctx, found),
        None => output.warning("Global hooks directory not found."),
    }

    output.section_header("Local repository hooks:");
    match &inventory.local {
        Some(found) => {
            output.info("Local .git-hooks directory found");
            print_scripts(ctx, found);
        }
        None => output.verbose("No local .git-hooks directory found"),
    }

    match &inventory.husky {
        Some(found) => {
            output.info("Husky directory found");
            for hook in found {
                let format = match hook.format {
                    HuskyFormat::New => "new format",
                    HuskyFormat::Old => "old format",
                    HuskyFormat::Both => "both new and old format",
                };
                output.list_item(&format!("{}: husky hook found ({format})", hook.hook));
            }
        }
        None => output.verbose("No Husky directory found"),
    }

    if let Some(found) = &inventory.standard {
        output.info("Standard Git hooks directory found");
        for hook in found {
            output.list_item(&format!("{hook}: standard hook found (executable)"));
        }
    }

    if inventory.is_empty() {
        output.blank_line();
        output.info("No hooks installed.");
    }

    Ok(ExitCode::SUCCESS)
}

fn print_scripts(ctx: &CommandContext, found: &[HookScripts]) {
    for entry in found {
        ctx.output.list_item(&format!("{}: {} script(s)", entry.hook, entry.scripts.len()));
        for script in &entry.scripts {
            ctx.output.indent(&format!("- {script}"));
        }
    }
}
