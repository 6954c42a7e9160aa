//! # Discovery Sources
//!
//! A [`Source`] walks one root location and emits discovered project roots
//! into a bounded queue; how the results are consumed is entirely the
//! caller's business. Root designators select the source variant by a
//! literal prefix:
//!
//! | Prefix         | Source                                         |
//! |----------------|------------------------------------------------|
//! | `file:`        | [`NodeSource`] over a local directory tree     |
//! | `svn:`         | [`NodeSource`] over a remote Subversion tree   |
//! | `github:`      | [`GithubSource`] over an owner's repositories  |
//! | `artifactory:` | [`ArtifactorySource`] over an artifact tree    |
//!
//! Scanner configuration (exclude globs, branch toggling) is validated at
//! configuration time: a bad pattern or an option a source cannot honor
//! fails before any scanning starts.

pub mod artifactory;
pub mod github;
pub mod node;
pub mod project;
pub mod queue;

use std::sync::Arc;

use crate::error::{Error, Result};

pub use artifactory::{ArtifactorySource, HttpArtifactoryApi};
pub use github::{GithubSource, HttpGithubApi};
pub use node::{FsNode, NodeSource, SvnNode};
pub use project::{DescriptorSet, ProjectRoot};
pub use queue::{bounded, ProjectQueue, ProjectReceiver};

/// A strategy that walks one root and feeds discovered project roots into
/// the destination queue.
pub trait Source: Send {
    /// Walk the root, pushing each recognized project root onto
    /// `destination`. Blocks when the queue is full; fails with
    /// `ScanInterrupted` when the consumer goes away, and with an I/O or
    /// listing error when the tree itself cannot be read.
    fn scan(&self, destination: &ProjectQueue) -> Result<()>;

    /// Register an exclude glob. Sources without a crawl (flat remote
    /// listings) reject this with `UnsupportedOption`.
    fn add_exclude(&mut self, pattern: &str) -> Result<()>;

    /// Set a scanner option (`branches` = `true`/`false` for tree
    /// walkers). Unknown keys and non-crawling sources fail with
    /// `UnsupportedOption`.
    fn set_option(&mut self, key: &str, value: &str) -> Result<()>;
}

impl std::fmt::Debug for dyn Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Source")
    }
}

/// Everything needed to construct sources from root designators.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub descriptors: DescriptorSet,
    pub github_api_root: String,
    pub github_token: Option<String>,
    pub artifactory_token: Option<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            descriptors: DescriptorSet::builtin(),
            github_api_root: crate::defaults::DEFAULT_GITHUB_API_ROOT.to_string(),
            github_token: None,
            artifactory_token: None,
        }
    }
}

/// Construct the source matching a root designator's prefix.
pub fn source_for_root(designator: &str, settings: &ScanSettings) -> Result<Box<dyn Source>> {
    if let Some(path) = designator.strip_prefix("file:") {
        return Ok(Box::new(NodeSource::new(
            Box::new(FsNode::new(path)),
            settings.descriptors.clone(),
        )));
    }
    if let Some(url) = designator.strip_prefix("svn:") {
        return Ok(Box::new(NodeSource::new(
            Box::new(SvnNode::root(url)),
            settings.descriptors.clone(),
        )));
    }
    if let Some(owner) = designator.strip_prefix("github:") {
        let api = HttpGithubApi::new(
            settings.github_api_root.clone(),
            settings.github_token.clone(),
        );
        return Ok(Box::new(GithubSource::new(
            owner,
            Box::new(api),
            settings.descriptors.clone(),
        )));
    }
    if let Some(base) = designator.strip_prefix("artifactory:") {
        let api = HttpArtifactoryApi::new(base, settings.artifactory_token.clone());
        return Ok(Box::new(ArtifactorySource::new(
            Arc::new(api),
            settings.descriptors.clone(),
        )));
    }
    Err(Error::UnknownRoot {
        designator: designator.to_string(),
    })
}
