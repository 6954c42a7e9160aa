//! # Remove Command Implementation
//!
//! Plans and executes the removal of a working copy. The plan refuses,
//! with a problem rather than an error, whenever deleting the tree would
//! lose local work: an undetectable backend, uncommitted changes, or
//! unpushed commits.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repo_scout::checkout::{Action, CheckoutPlanner};
use repo_scout::config;
use repo_scout::output::OutputConfig;

/// Arguments for the remove command
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// The working copy to remove
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "REPO_SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, output: &OutputConfig) -> Result<()> {
    let config = config::load_or_default(args.config.as_deref())?;
    let planner = CheckoutPlanner::new(config.mount_root());

    if !args.directory.exists() {
        anyhow::bail!("no working copy at {}", args.directory.display());
    }

    match planner.plan_remove(&args.directory)? {
        Action::Problem { directory, reason } => {
            eprintln!(
                "{} {}: {}",
                output.problem("problem:"),
                directory.display(),
                reason
            );
            anyhow::bail!("removal refused: {reason}");
        }
        action => {
            println!("plan: {action}");
            if args.dry_run {
                println!("{}", output.detail("dry run, nothing done"));
            } else {
                planner.execute(&action)?;
                println!(
                    "{} removed {}",
                    output.found("done:"),
                    args.directory.display()
                );
            }
        }
    }
    Ok(())
}
