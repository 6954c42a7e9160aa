//! Default values for repo-scout configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = ".repo-scout.yaml";

/// Capacity of the discovery queue between scanners and the consumer.
///
/// Bounded on purpose: a full queue blocks the scanners, which keeps a
/// fast scan from buffering an unbounded backlog ahead of a slow consumer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Root of the GitHub REST API.
pub const DEFAULT_GITHUB_API_ROOT: &str = "https://api.github.com";

/// Returns the default mount root: the directory working copies are
/// checked out under, keyed by host and repository path.
///
/// Uses the platform data directory (`~/.local/share/repo-scout/checkouts`
/// on Linux), falling back to `.repo-scout-checkouts` in the current
/// directory when the platform directory cannot be determined. Overridden
/// by the `--mount-root` CLI flag or the `mount_root` configuration key.
pub fn default_mount_root() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("repo-scout").join("checkouts"))
        .unwrap_or_else(|| PathBuf::from(".repo-scout-checkouts"))
}
