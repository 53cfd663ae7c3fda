use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{
    CommandContext, EXIT_INTERRUPTED, clean_repositories, print_json, report_clean,
    scan_repositories, start_path,
};
use crate::cleaner::CleanSummary;
use crate::error::HooksError;

#[derive(Args)]
pub struct CleanLocalHooksArgs {
    /// Directory to search (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Maximum directory depth to search
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

pub async fn execute(args: CleanLocalHooksArgs, ctx: &CommandContext) -> Result<ExitCode> {
    let output = &ctx.output;
    let path = start_path(args.path);
    let max_depth = args.max_depth.unwrap_or(ctx.settings.scan.max_depth);

    let repositories = match scan_repositories(ctx, &path, max_depth) {
        Ok(repositories) => repositories,
        Err(HooksError::Cancelled) => {
            output.warning("Operation cancelled.");
            return Ok(ExitCode::from(EXIT_INTERRUPTED));
        }
        Err(e) => return Err(e).context("Scanning repositories"),
    };

    output.verbose(&format!(
        "Found {} repositories with custom hooksPath",
        repositories.len()
    ));

    if repositories.is_empty() {
        if ctx.is_json() {
            print_json(&CleanSummary::default())?;
        }
        output.success("No repositories found with custom hooksPath configuration.");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.force {
        output.warning(&format!(
            "This will remove hooksPath configuration from {} repositories:",
            repositories.len()
        ));
        for repository in &repositories {
            output.list_item(&repository.path.display().to_string());
            output.indent(&format!("hooksPath: {}", repository.override_str()));
        }
        output.blank_line();

        if !ctx.confirm("Continue?").await? {
            if ctx.cancel.is_cancelled() {
                output.warning("Operation cancelled.");
                return Ok(ExitCode::from(EXIT_INTERRUPTED));
            }
            output.info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let summary = clean_repositories(ctx, &repositories);
    report_clean(ctx, &summary)
}
