//! # Status Command Implementation
//!
//! Walks the mount root (or a named directory), finds every working copy
//! by probing each directory's backend, and reports the recorded remote,
//! remote reachability and cleanliness. Working copies are probed in
//! parallel; the subtree below a detected working copy is never descended
//! into.

use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;
use walkdir::WalkDir;

use repo_scout::config;
use repo_scout::output::OutputConfig;
use repo_scout::scm::ScmRegistry;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory to inspect (defaults to the mount root)
    #[arg(value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Directory working copies are mounted under
    #[arg(long, value_name = "DIR", env = "REPO_SCOUT_MOUNT")]
    pub mount_root: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "REPO_SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip the remote reachability probe
    #[arg(long)]
    pub offline: bool,
}

struct CheckoutReport {
    path: PathBuf,
    kind: &'static str,
    remote: String,
    alive: Option<bool>,
    committed: bool,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, output: &OutputConfig) -> Result<()> {
    let config = config::load_or_default(args.config.as_deref())?;
    let root = args
        .directory
        .or(args.mount_root)
        .unwrap_or_else(|| config.mount_root());

    if !root.is_dir() {
        println!("no working copies under {}", root.display());
        return Ok(());
    }

    let registry = ScmRegistry::default();

    // Collect working-copy roots first; a working copy's subtree is never
    // descended into.
    let mut checkouts = Vec::new();
    let mut walker = WalkDir::new(&root).into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if registry.probe_checkout(entry.path()).is_some() {
            checkouts.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }

    let offline = args.offline;
    let registry = &registry;
    let mut reports: Vec<CheckoutReport> = checkouts
        .par_iter()
        .filter_map(|path| {
            let scm = registry.probe_checkout(path)?;
            Some(CheckoutReport {
                path: path.clone(),
                kind: scm.kind().as_str(),
                remote: scm
                    .remote_url(path)
                    .unwrap_or_else(|_| "(unknown remote)".to_string()),
                alive: (!offline).then(|| scm.is_alive(path)),
                committed: scm.is_committed(path),
            })
        })
        .collect();
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    for report in &reports {
        let mut flags = Vec::new();
        match report.alive {
            Some(true) => flags.push(output.found("alive")),
            Some(false) => flags.push(output.problem("unreachable")),
            None => {}
        }
        if report.committed {
            flags.push(output.detail("clean"));
        } else {
            flags.push(output.problem("has local work"));
        }
        println!(
            "{} [{}] {} ({})",
            report.path.display(),
            report.kind,
            report.remote,
            flags.join(", ")
        );
    }
    println!("{} working copy(ies)", reports.len());
    Ok(())
}
