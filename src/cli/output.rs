//! Console output for the CLI
//!
//! Styled status lines, spinners and confirmation prompts. Progress and
//! prompts go to stderr so `--format json` output on stdout stays parseable.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Only printed with `-v`
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    pub fn section_header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().cyan());
        }
    }

    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {item}");
        }
    }

    pub fn indent(&self, message: &str) {
        if !self.quiet {
            println!("    {message}");
        }
    }

    pub fn separator(&self) {
        if !self.quiet {
            println!("{}", style("━".repeat(36)).dim());
        }
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }

    /// Print an action result with consistent styling
    pub fn action_result(&self, action: &str, result: &str, success: bool) {
        if self.quiet && success {
            return;
        }
        let icon = if success {
            style("✓").green().bold()
        } else {
            style("✗").red().bold()
        };
        if success {
            println!("{} {} {}", icon, style(action).bold(), style(result).dim());
        } else {
            eprintln!("{} {} {}", icon, style(action).bold(), style(result).red());
        }
    }

    /// Spinner for indefinite work, hidden in quiet mode and off a terminal
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb.set_message(message.to_string());
        pb
    }

    /// Print a yes/no question without a trailing newline
    pub fn prompt(message: &str) -> io::Result<()> {
        let mut stderr = io::stderr();
        write!(stderr, "{} {} (y/N): ", style("❯").cyan(), message)?;
        stderr.flush()
    }

    /// Read one answer line from stdin. End of input counts as "no".
    pub fn read_confirmation() -> io::Result<bool> {
        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Pick the singular or plural noun for `count`
pub fn pluralize(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 { singular } else { plural }
}
