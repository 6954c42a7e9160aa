//! # Scan Command Implementation
//!
//! Scans one or more roots for project roots and streams what was
//! discovered to stdout.
//!
//! Each root designator is classified by its prefix (`file:`, `svn:`,
//! `github:`, `artifactory:`) and scanned on its own worker; all scanners
//! feed one bounded queue that a printer thread drains. Scanner
//! configuration is validated for every root before any scanning starts,
//! and a root that fails mid-scan does not abort the others; failures are
//! collected and reported at the end.

use anyhow::Result;
use clap::{Args, ValueEnum};
use rayon::prelude::*;
use std::path::PathBuf;

use repo_scout::config;
use repo_scout::output::OutputConfig;
use repo_scout::scan::{self, ProjectRoot, Source};

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root designators to scan (file:, svn:, github:, artifactory:).
    /// Defaults to the roots listed in the configuration file.
    #[arg(value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", env = "REPO_SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Exclude glob, repeatable; applies to tree-walking roots
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Do not scan branches/ children alongside trunk
    #[arg(long)]
    pub no_branches: bool,

    /// Capacity of the discovery queue
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Output format for discovered project roots
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ScanFormat,

    /// Suppress the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for discovered project roots
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ScanFormat {
    /// One human-readable line per project root
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Execute the `scan` command.
pub fn execute(args: ScanArgs, output: &OutputConfig) -> Result<()> {
    let config = config::load_or_default(args.config.as_deref())?;

    let roots = if args.roots.is_empty() {
        config.roots.clone()
    } else {
        args.roots.clone()
    };
    if roots.is_empty() {
        anyhow::bail!(
            "no roots to scan: pass root designators or list them under `roots:` in {}",
            repo_scout::defaults::DEFAULT_CONFIG_FILENAME
        );
    }

    // Build and configure every source up front; configuration problems
    // fail fast, before anything is scanned.
    let settings = config.scan_settings()?;
    let mut excludes = config.excludes.clone();
    excludes.extend(args.excludes.iter().cloned());
    let disable_branches = args.no_branches || !config.with_branches;

    let mut sources: Vec<(String, Box<dyn Source>)> = Vec::with_capacity(roots.len());
    for root in &roots {
        let mut source = scan::source_for_root(root, &settings)?;
        for pattern in &excludes {
            source.add_exclude(pattern)?;
        }
        if disable_branches {
            source.set_option("branches", "false")?;
        }
        sources.push((root.clone(), source));
    }

    let capacity = args.queue_capacity.unwrap_or(config.queue_capacity);
    let (queue, receiver) = scan::bounded(capacity);

    // The printer owns the consumer half; scanners block when it falls
    // behind.
    let format = args.format;
    let printer_output = output.clone();
    let printer = std::thread::spawn(move || {
        let mut count = 0usize;
        for root in receiver.iter() {
            print_root(&root, format, &printer_output);
            count += 1;
        }
        count
    });

    // One worker per root; a failing root is reported, not fatal to the
    // rest of the scan.
    let failures: Vec<(String, String)> = sources
        .into_par_iter()
        .filter_map(|(root, source)| {
            source
                .scan(&queue)
                .err()
                .map(|error| (root, error.to_string()))
        })
        .collect();
    drop(queue);

    let count = match printer.join() {
        Ok(count) => count,
        Err(_) => anyhow::bail!("printer thread panicked"),
    };

    if !args.quiet {
        println!("{} project root(s) discovered", count);
    }
    for (root, error) in &failures {
        eprintln!("{} {}: {}", output.problem("scan failed:"), root, error);
    }
    if !failures.is_empty() {
        anyhow::bail!("{} of {} root(s) failed to scan", failures.len(), roots.len());
    }
    Ok(())
}

fn print_root(root: &ProjectRoot, format: ScanFormat, output: &OutputConfig) {
    match format {
        ScanFormat::Json => match serde_json::to_string(root) {
            Ok(line) => println!("{line}"),
            Err(error) => eprintln!("cannot serialize {}: {}", root.origin, error),
        },
        ScanFormat::Text => {
            let scm = root
                .scm_url
                .as_deref()
                .map(|url| format!(" <{url}>"))
                .unwrap_or_default();
            println!(
                "{} {} [{}]{} {}",
                output.found("+"),
                root.origin,
                root.kind,
                scm,
                output.detail(&root.revision),
            );
        }
    }
}
