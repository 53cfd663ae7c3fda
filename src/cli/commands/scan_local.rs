use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{
    CommandContext, EXIT_INTERRUPTED, clean_repositories, print_json, report_clean,
    scan_repositories, start_path,
};
use crate::cleaner::CleanSummary;
use crate::cli::output::pluralize;
use crate::error::HooksError;

#[derive(Args)]
pub struct ScanLocalArgs {
    /// Directory to search (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Maximum directory depth to search
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Remove the overrides that were found
    #[arg(long)]
    pub auto_fix: bool,

    /// Skip the confirmation prompt when used with --auto-fix
    #[arg(short, long, requires = "auto_fix")]
    pub yes: bool,
}

pub async fn execute(args: ScanLocalArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let output = &ctx.output;
    let path = start_path(args.path);
    let max_depth = args.max_depth.unwrap_or(ctx.settings.scan.max_depth);

    output.info("Scanning for local hook overrides...");
    let repositories = match scan_repositories(ctx, &path, max_depth) {
        Ok(repositories) => repositories,
        Err(HooksError::Cancelled) => {
            output.warning("Operation cancelled.");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        Err(e) => return Err(e).context("Scanning repositories"),
    };

    if ctx.is_json() && !args.auto_fix {
        print_json(&repositories)?;
        return Ok(ExitCode::SUCCESS);
    }

    if repositories.is_empty() {
        output.success("No repositories found with local hooksPath overrides.");
        if ctx.is_json() {
            print_json(&CleanSummary::default())?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let noun = pluralize(repositories.len(), "repository", "repositories");
    output.section_header(&format!(
        "Found {} {} with local hook overrides:",
        repositories.len(),
        noun
    ));
    output.blank_line();
    for repository in &repositories {
        if output.is_verbose() {
            output.list_item(&repository.path.display().to_string());
            output.indent(&format!("Override: core.hooksPath = {}", repository.override_str()));
        } else {
            output.list_item(&format!(
                "{} (core.hooksPath = {})",
                repository.path.display(),
                repository.override_str()
            ));
        }
    }

    if !args.auto_fix {
        output.blank_line();
        output.separator();
        output.info(&format!(
            "Summary: {} {} with local overrides",
            repositories.len(),
            noun
        ));
        output.blank_line();
        output.info("Tip: Use --auto-fix to remove these overrides");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes && !ctx.confirm("Remove these local overrides?").await? {
        if ctx.cancel.is_cancelled() {
            output.warning("Operation cancelled.");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    output.info("Removing overrides...");
    let summary = clean_repositories(ctx, &repositories);
    report_clean(ctx, &summary)
}
