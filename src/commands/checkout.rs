//! # Checkout Command Implementation
//!
//! Computes the canonical location of a repository under the mount root,
//! plans the checkout, and executes the plan. Planning and execution are
//! separate steps, so `--dry-run` shows exactly what would happen (the
//! destination and the clone invocation) without touching the
//! filesystem.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use repo_scout::checkout::{Action, CheckoutPlanner};
use repo_scout::config;
use repo_scout::output::OutputConfig;

/// Arguments for the checkout command
#[derive(Args, Debug)]
pub struct CheckoutArgs {
    /// SCM location: an https/ssh git URL, scp-like git shorthand, or a
    /// Subversion URL (trunk/branch paths fold to the project)
    #[arg(value_name = "LOCATION")]
    pub location: String,

    /// Directory working copies are mounted under
    #[arg(long, value_name = "DIR", env = "REPO_SCOUT_MOUNT")]
    pub mount_root: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "REPO_SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Execute the `checkout` command.
pub fn execute(args: CheckoutArgs, output: &OutputConfig) -> Result<()> {
    let config = config::load_or_default(args.config.as_deref())?;
    let mount_root = args.mount_root.unwrap_or_else(|| config.mount_root());

    let planner = CheckoutPlanner::new(mount_root);
    let destination = planner.directory_for(&args.location)?;

    match planner.plan_create(&destination, Some(&args.location))? {
        None => {
            println!(
                "{} {} is already checked out",
                output.found("ok:"),
                destination.display()
            );
        }
        Some(Action::Problem { directory, reason }) => {
            eprintln!(
                "{} {}: {}",
                output.problem("problem:"),
                directory.display(),
                reason
            );
            anyhow::bail!("checkout refused: {reason}");
        }
        Some(action) => {
            println!("plan: {action}");
            if args.dry_run {
                println!("{}", output.detail("dry run, nothing done"));
            } else {
                planner.execute(&action)?;
                println!("{} checked out {}", output.found("done:"), destination.display());
            }
        }
    }
    Ok(())
}
