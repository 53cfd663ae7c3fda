use anyhow::{Context, Result};
use clap::builder::styling::{AnsiColor, Styles};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cancel::CancelToken;
use crate::cleaner::{CleanSummary, Cleaner};
use crate::cli::output::{Output, pluralize};
use crate::config::Settings;
use crate::git::Repository;
use crate::scanner::Scanner;

pub mod clean_local_hooks;
pub mod debug;
pub mod list;
pub mod scan_local;

/// Exit status of a run interrupted with Ctrl+C (128 + SIGINT)
pub const EXIT_INTERRUPTED: u8 = 130;

fn help_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Yellow.on_default().bold())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(
    name = "git-hooks",
    version = crate::VERSION,
    about = "Manage global git hooks and the local overrides that bypass them",
    long_about = "Finds repositories whose .git/config sets core.hooksPath, which silently \
                  disables globally managed hooks, and removes exactly that override.",
    styles = help_styles()
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Styled, human readable output
    Text,
    /// JSON on stdout for machine processing
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan for repositories with local hooksPath overrides
    ScanLocal(scan_local::ScanLocalArgs),
    /// Remove hooksPath configuration from git repositories
    CleanLocalHooks(clean_local_hooks::CleanLocalHooksArgs),
    /// List installed git hooks
    List(list::ListArgs),
    /// Diagnose hook lookup and the global hooks setup
    Debug(debug::DebugArgs),
}

/// State shared by every command of one invocation
pub struct CommandContext {
    pub output: Output,
    pub settings: Settings,
    pub format: OutputFormat,
    pub cancel: CancelToken,
}

impl CommandContext {
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Ask a yes/no question on the terminal.
    ///
    /// Ctrl+C while waiting cancels the run and counts as "no".
    pub async fn confirm(&self, message: &str) -> Result<bool> {
        Output::prompt(message)?;

        // A plain thread, so an unanswered prompt never holds up runtime shutdown
        let (tx, rx) = tokio::sync::oneshot::channel();
        std::thread::spawn(move || {
            let _ = tx.send(Output::read_confirmation());
        });

        tokio::select! {
            answer = rx => Ok(answer.context("Confirmation prompt closed unexpectedly")??),
            _ = tokio::signal::ctrl_c() => {
                eprintln!();
                self.cancel.cancel();
                Ok(false)
            }
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        // Change directory if specified
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to change directory to {}", dir.display()))?;
        }

        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        let Some(command) = self.command else {
            Cli::command().print_help()?;
            return Ok(ExitCode::SUCCESS);
        };

        let project_dir = std::env::current_dir().context("Failed to determine current directory")?;
        let settings = Settings::load(&project_dir, self.config.as_deref())
            .context("Failed to load configuration")?;

        let cancel = CancelToken::new();
        watch_for_interrupt(cancel.clone());

        let json = self.format == OutputFormat::Json;
        let ctx = CommandContext {
            // Human readable messages would corrupt JSON on stdout
            output: Output::new(self.verbose > 0, self.quiet || json),
            settings,
            format: self.format,
            cancel,
        };

        match command {
            Commands::ScanLocal(args) => scan_local::execute(args, &ctx).await,
            Commands::CleanLocalHooks(args) => clean_local_hooks::execute(args, &ctx).await,
            Commands::List(args) => list::execute(args, &project_dir, &ctx),
            Commands::Debug(args) => debug::execute(args, &project_dir, &ctx),
        }
    }
}

/// First Ctrl+C cancels cooperatively; a second one exits immediately.
fn watch_for_interrupt(cancel: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::debug!("Interrupt received, cancelling");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // Logs share stderr with progress output so stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Starting directory argument, defaulting to the current directory
pub(crate) fn start_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from("."))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Scan `path` on the current worker thread while the interrupt watcher
/// keeps running on the others.
pub(crate) fn scan_repositories(
    ctx: &CommandContext,
    path: &Path,
    max_depth: usize,
) -> crate::error::Result<Vec<Repository>> {
    let scanner = Scanner::new(ctx.settings.store.backend.store())
        .with_max_depth(max_depth)
        .with_cancel(ctx.cancel.clone());

    let spinner = ctx.output.spinner("Searching for repositories...");
    let result = tokio::task::block_in_place(|| scanner.scan(path));
    spinner.finish_and_clear();
    result
}

pub(crate) fn clean_repositories<'a>(ctx: &CommandContext, repositories: &'a [Repository]) -> CleanSummary<'a> {
    let strategy = ctx.settings.clean.strategy(repositories.len());
    let cleaner = Cleaner::new(ctx.settings.store.backend.store())
        .with_strategy(strategy)
        .with_cancel(ctx.cancel.clone());

    let progress = ctx.output.progress_bar(repositories.len() as u64, "Removing overrides");
    let summary = tokio::task::block_in_place(|| cleaner.clean_with(repositories, |_| progress.inc(1)));
    progress.finish_and_clear();
    summary
}

/// Print per-repository results and the closing summary of a clean run
pub(crate) fn report_clean(ctx: &CommandContext, summary: &CleanSummary<'_>) -> Result<ExitCode> {
    if ctx.is_json() {
        print_json(summary)?;
        return Ok(clean_exit_code(summary));
    }

    let output = &ctx.output;
    output.blank_line();
    for result in &summary.results {
        let path = result.repository.path.display().to_string();
        match &result.error {
            Some(error) => output.action_result(&path, &error.to_string(), false),
            None if output.is_verbose() => {
                output.action_result(&path, &format!("removed: {}", result.previous_value), true)
            }
            None => output.action_result(&path, "", true),
        }
    }

    output.blank_line();
    output.separator();
    if summary.is_complete_success() {
        output.success(&format!(
            "Summary: {} {} removed successfully",
            summary.configs_removed,
            pluralize(summary.configs_removed, "override", "overrides")
        ));
    } else {
        let failed = summary.repositories_with_config - summary.configs_removed;
        output.warning(&format!("Summary: {} removed, {} failed", summary.configs_removed, failed));
        if summary.was_cancelled() {
            output.warning(&format!(
                "Operation cancelled; {} {} not attempted",
                summary.not_attempted(),
                pluralize(summary.not_attempted(), "repository was", "repositories were")
            ));
        }
    }
    output.separator();

    Ok(clean_exit_code(summary))
}

fn clean_exit_code(summary: &CleanSummary<'_>) -> ExitCode {
    if summary.was_cancelled() {
        ExitCode::from(EXIT_INTERRUPTED)
    } else if summary.is_complete_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
