//! # Configuration Schema and Parsing
//!
//! This module defines the data structures representing the
//! `.repo-scout.yaml` configuration file and the logic for parsing it.
//! The file is optional: every field has a default, and the CLI flags
//! override whatever the file provides.
//!
//! Unknown keys are rejected at parse time so a typo never silently turns
//! into a default.
//!
//! ```yaml
//! mount_root: /srv/mirror
//! queue_capacity: 128
//! with_branches: true
//! roots:
//!   - file:/srv/projects
//!   - svn:https://svn.example.org/repos
//!   - github:acme
//! excludes:
//!   - target
//!   - "*.bak"
//! descriptors:
//!   - kind: sbt
//!     pattern: "*.sbt"
//! github:
//!   token: ghp_...
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::scan::project::DescriptorSet;
use crate::scan::ScanSettings;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory working copies are mounted under.
    #[serde(default)]
    pub mount_root: Option<PathBuf>,

    /// Root designators scanned when the CLI names none.
    #[serde(default)]
    pub roots: Vec<String>,

    /// Exclude globs applied to tree-walking sources.
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Whether `branches/` children are scanned alongside `trunk`.
    #[serde(default = "default_with_branches")]
    pub with_branches: bool,

    /// Capacity of the discovery queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Additional descriptor registrations, appended to the built-ins.
    #[serde(default)]
    pub descriptors: Vec<DescriptorEntry>,

    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Artifactory API settings.
    #[serde(default)]
    pub artifactory: ArtifactoryConfig,
}

/// One additional descriptor registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorEntry {
    pub kind: String,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    #[serde(default = "default_github_api_root")]
    pub api_root: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_root: default_github_api_root(),
            token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ArtifactoryConfig {
    #[serde(default)]
    pub token: Option<String>,
}

// Kept in line with the serde field defaults: an absent file and an empty
// file configure the same behavior.
impl Default for Config {
    fn default() -> Self {
        Self {
            mount_root: None,
            roots: Vec::new(),
            excludes: Vec::new(),
            with_branches: default_with_branches(),
            queue_capacity: default_queue_capacity(),
            descriptors: Vec::new(),
            github: GithubConfig::default(),
            artifactory: ArtifactoryConfig::default(),
        }
    }
}

fn default_with_branches() -> bool {
    true
}

fn default_queue_capacity() -> usize {
    defaults::DEFAULT_QUEUE_CAPACITY
}

fn default_github_api_root() -> String {
    defaults::DEFAULT_GITHUB_API_ROOT.to_string()
}

impl Config {
    /// The effective mount root.
    pub fn mount_root(&self) -> PathBuf {
        self.mount_root
            .clone()
            .unwrap_or_else(defaults::default_mount_root)
    }

    /// The descriptor registry: built-ins plus configured extras.
    pub fn descriptor_set(&self) -> Result<DescriptorSet> {
        DescriptorSet::with_extras(
            self.descriptors
                .iter()
                .map(|entry| (entry.kind.as_str(), entry.pattern.as_str())),
        )
    }

    /// Settings for constructing scan sources.
    pub fn scan_settings(&self) -> Result<ScanSettings> {
        Ok(ScanSettings {
            descriptors: self.descriptor_set()?,
            github_api_root: self.github.api_root.clone(),
            github_token: self.github.token.clone(),
            artifactory_token: self.artifactory.token.clone(),
        })
    }
}

/// Parse a configuration from YAML.
pub fn parse(yaml: &str) -> Result<Config> {
    serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })
}

/// Load a configuration file from disk.
pub fn from_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Load the configuration at `path` when given, fall back to
/// `.repo-scout.yaml` in the working directory, and to defaults when
/// neither exists. An explicitly named file must exist.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => from_file(path),
        None => {
            let fallback = Path::new(defaults::DEFAULT_CONFIG_FILENAME);
            if fallback.exists() {
                from_file(fallback)
            } else {
                Ok(Config::default())
            }
        }
    }
}
