//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use repo_scout::output::OutputConfig;

use crate::commands;

/// Repo Scout - Discover projects across SCM backends and manage their
/// working copies
#[derive(Parser, Debug)]
#[command(name = "repo-scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan roots for project roots and print what was discovered
    Scan(commands::scan::ScanArgs),

    /// Check a repository out at its canonical location under the mount root
    Checkout(commands::checkout::CheckoutArgs),

    /// Remove a working copy, refusing when local work would be lost
    Remove(commands::remove::RemoveArgs),

    /// Report the state of working copies under the mount root
    Status(commands::status::StatusArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .init();
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Scan(args) => commands::scan::execute(args, &output),
            Commands::Checkout(args) => commands::checkout::execute(args, &output),
            Commands::Remove(args) => commands::remove::execute(args, &output),
            Commands::Status(args) => commands::status::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
