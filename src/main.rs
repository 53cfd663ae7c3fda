use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use git_hooks::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    cli.run().await
}
