//! # SCM Backend Abstraction
//!
//! This module defines the [`Scm`] trait, the uniform contract every
//! version-control backend implements, and the [`ScmRegistry`] that probes
//! backends in a fixed priority order (Git before Subversion).
//!
//! Backends are selected by *probing*, never by configuration: a working
//! copy is classified by its on-disk marker directory, a location string by
//! each backend's recognizer. The backends themselves are stateless unit
//! structs; every operation is a pure function of the filesystem and
//! subprocess results it consults, so a single registry can be shared
//! freely across concurrently scanning threads.
//!
//! The trait deliberately distinguishes expected negatives from failures:
//! `is_alive` and `is_committed` answer with booleans (an unreachable
//! remote is data, not a defect), while `remote_url` fails loudly when the
//! underlying subprocess does.

pub mod git;
pub mod process;
pub mod svn;
pub mod url;

use std::path::Path;

use crate::error::Result;

pub use self::git::GitScm;
pub use self::process::Invocation;
pub use self::svn::SubversionScm;
pub use self::url::{fold_layout, ScmKind, ScmUrl, Transport};

/// Uniform contract over version-control backends.
pub trait Scm: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> ScmKind;

    /// Whether `dir` is a working copy of this backend (marker-directory
    /// test, no subprocess).
    fn is_checkout(&self, dir: &Path) -> bool;

    /// Whether this backend claims the given location string.
    fn recognizes(&self, location: &str) -> bool;

    /// Normalize a location string into this backend's identity form.
    fn normalize(&self, location: &str) -> Result<ScmUrl>;

    /// The remote location recorded in an existing working copy.
    ///
    /// Fails with an `ScmCommand` error when the subprocess exits non-zero,
    /// including the case where `checkout` is not actually a working copy
    /// of this backend.
    fn remote_url(&self, checkout: &Path) -> Result<String>;

    /// Describe (do not run) the process that checks `url` out into
    /// `destination`. The clone runs in the destination's parent and names
    /// the new directory after the destination's leaf.
    fn checkout_invocation(&self, destination: &Path, url: &ScmUrl) -> Result<Invocation>;

    /// Dry-run reachability probe of the working copy's remote. Any
    /// subprocess failure means "not alive"; it is never re-raised.
    fn is_alive(&self, checkout: &Path) -> bool;

    /// Whether the working copy has no local work left: nothing unstaged,
    /// nothing staged but uncommitted, nothing unpushed. Any failing check
    /// short-circuits to `false`.
    fn is_committed(&self, checkout: &Path) -> bool;
}

/// Ordered set of backends, probed front to back.
///
/// The default registry holds Git then Subversion. Tests substitute mock
/// backends through [`ScmRegistry::with_backends`].
pub struct ScmRegistry {
    backends: Vec<Box<dyn Scm>>,
}

impl Default for ScmRegistry {
    fn default() -> Self {
        Self {
            backends: vec![Box::new(GitScm), Box::new(SubversionScm)],
        }
    }
}

impl ScmRegistry {
    /// Build a registry with a custom backend list. Primarily a test seam.
    pub fn with_backends(backends: Vec<Box<dyn Scm>>) -> Self {
        Self { backends }
    }

    /// Classify an existing directory as a working copy of some backend.
    pub fn probe_checkout(&self, dir: &Path) -> Option<&dyn Scm> {
        self.backends
            .iter()
            .map(AsRef::as_ref)
            .find(|scm| scm.is_checkout(dir))
    }

    /// Classify a location string.
    pub fn probe_url(&self, location: &str) -> Option<&dyn Scm> {
        self.backends
            .iter()
            .map(AsRef::as_ref)
            .find(|scm| scm.recognizes(location))
    }

    /// Look up a backend by kind.
    pub fn backend(&self, kind: ScmKind) -> Option<&dyn Scm> {
        self.backends
            .iter()
            .map(AsRef::as_ref)
            .find(|scm| scm.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_checkout_prefers_git() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::create_dir(temp.path().join(".svn")).unwrap();

        let registry = ScmRegistry::default();
        let scm = registry.probe_checkout(temp.path()).unwrap();
        assert_eq!(scm.kind(), ScmKind::Git);
    }

    #[test]
    fn test_probe_checkout_detects_subversion() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".svn")).unwrap();

        let registry = ScmRegistry::default();
        let scm = registry.probe_checkout(temp.path()).unwrap();
        assert_eq!(scm.kind(), ScmKind::Subversion);
    }

    #[test]
    fn test_probe_checkout_none_for_plain_directory() {
        let temp = TempDir::new().unwrap();
        let registry = ScmRegistry::default();
        assert!(registry.probe_checkout(temp.path()).is_none());
    }

    #[test]
    fn test_probe_url_classifies_backends() {
        let registry = ScmRegistry::default();

        let git = registry.probe_url("git@github.com:x/y.git").unwrap();
        assert_eq!(git.kind(), ScmKind::Git);

        let svn = registry
            .probe_url("https://svn.example.org/repos/puc/trunk")
            .unwrap();
        assert_eq!(svn.kind(), ScmKind::Subversion);

        assert!(registry.probe_url("ftp://example.org/x").is_none());
    }

    #[test]
    fn test_backend_lookup_by_kind() {
        let registry = ScmRegistry::default();
        assert_eq!(
            registry.backend(ScmKind::Subversion).unwrap().kind(),
            ScmKind::Subversion
        );
    }
}
