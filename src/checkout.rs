//! # Checkout Lifecycle
//!
//! Planning and execution of local working copies under a mount root.
//!
//! The lifecycle is strictly two-phase: `plan_*` methods compute an
//! [`Action`] without touching the filesystem, and [`CheckoutPlanner::execute`]
//! carries it out. The separation lets a caller preview every pending
//! action as a dry-run listing before anything is cloned or deleted.
//!
//! Planning never throws for "nothing to do": an up-to-date working copy
//! plans to `None`, keeping "no action needed" distinguishable from both
//! conflicts and errors. Conflicts (a foreign checkout in the way, local
//! work that would be destroyed) become [`Action::Problem`] values that
//! execution refuses to touch.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::scan::project::ProjectRoot;
use crate::scm::{ScmRegistry, ScmUrl};

/// One planned step of a reconciliation pass. Short-lived: planned,
/// previewed, then executed or reported.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Clone `url` into `destination`.
    Create { url: ScmUrl, destination: PathBuf },
    /// Delete the working copy at `directory`.
    Remove { directory: PathBuf },
    /// A non-actionable conflict; carries a human-readable reason.
    Problem { directory: PathBuf, reason: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create { url, destination } => {
                write!(f, "create {} from {}", destination.display(), url)
            }
            Action::Remove { directory } => write!(f, "remove {}", directory.display()),
            Action::Problem { directory, reason } => {
                write!(f, "problem at {}: {}", directory.display(), reason)
            }
        }
    }
}

/// Computes canonical working-copy locations under a mount root and plans
/// create/remove actions against what is already on disk.
pub struct CheckoutPlanner {
    mount_root: PathBuf,
    registry: ScmRegistry,
}

impl CheckoutPlanner {
    pub fn new(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: mount_root.into(),
            registry: ScmRegistry::default(),
        }
    }

    /// Build a planner with a custom backend registry. Primarily a test
    /// seam.
    pub fn with_registry(mount_root: impl Into<PathBuf>, registry: ScmRegistry) -> Self {
        Self {
            mount_root: mount_root.into(),
            registry,
        }
    }

    pub fn mount_root(&self) -> &Path {
        &self.mount_root
    }

    pub fn registry(&self) -> &ScmRegistry {
        &self.registry
    }

    /// The canonical local directory for a project's working copy.
    ///
    /// Fails with `MissingScm` when the project has no SCM location and
    /// with `UnknownScm` when no backend recognizes it.
    pub fn directory(&self, project: &ProjectRoot) -> Result<PathBuf> {
        let location = project.scm_url.as_deref().ok_or_else(|| Error::MissingScm {
            origin: project.origin.clone(),
        })?;
        self.directory_for(location)
    }

    /// The canonical local directory for a raw SCM location.
    pub fn directory_for(&self, location: &str) -> Result<PathBuf> {
        let url = self.normalize(location)?;
        Ok(self.mount_root.join(url.relative_dir()))
    }

    /// Plan bringing `location` into existence at `directory`.
    ///
    /// - Existing directory of the same repository: nothing to do (`None`).
    /// - Existing directory of unknown or different origin: a `Problem`.
    /// - No directory: a `Create` action. A missing `location` fails with
    ///   `MissingScm`.
    pub fn plan_create(
        &self,
        directory: &Path,
        location: Option<&str>,
    ) -> Result<Option<Action>> {
        if directory.exists() {
            let Some(scm) = self.registry.probe_checkout(directory) else {
                return Ok(Some(Action::Problem {
                    directory: directory.to_path_buf(),
                    reason: "cannot detect the existing checkout's backend".to_string(),
                }));
            };
            let recorded = scm.remote_url(directory)?;
            let actual = scm.normalize(&recorded)?;
            let intended = self.normalize(self.require_location(directory, location)?)?;
            if intended.same(&actual) {
                return Ok(None);
            }
            return Ok(Some(Action::Problem {
                directory: directory.to_path_buf(),
                reason: format!(
                    "checkout conflict: existing {} vs intended {}",
                    actual.url(),
                    intended.url()
                ),
            }));
        }

        let url = self.normalize(self.require_location(directory, location)?)?;
        Ok(Some(Action::Create {
            url,
            destination: directory.to_path_buf(),
        }))
    }

    /// Plan the creation of a project's working copy at its canonical
    /// location.
    pub fn plan_project(&self, project: &ProjectRoot) -> Result<Option<Action>> {
        let directory = self.directory(project)?;
        self.plan_create(&directory, project.scm_url.as_deref())
    }

    /// Plan the removal of the working copy at `directory`.
    ///
    /// A directory whose backend cannot be detected, or that still holds
    /// uncommitted or unpushed work, plans to a `Problem`; the tree is
    /// never deleted in that case.
    pub fn plan_remove(&self, directory: &Path) -> Result<Action> {
        let Some(scm) = self.registry.probe_checkout(directory) else {
            return Ok(Action::Problem {
                directory: directory.to_path_buf(),
                reason: "cannot detect the checkout's backend".to_string(),
            });
        };
        if !scm.is_committed(directory) {
            return Ok(Action::Problem {
                directory: directory.to_path_buf(),
                reason: "checkout is not committed".to_string(),
            });
        }
        Ok(Action::Remove {
            directory: directory.to_path_buf(),
        })
    }

    /// Carry out a planned action.
    ///
    /// `Problem` actions are reported, never acted on; executing one is a
    /// no-op beyond a warning.
    pub fn execute(&self, action: &Action) -> Result<()> {
        match action {
            Action::Create { url, destination } => {
                let scm = self
                    .registry
                    .backend(url.kind())
                    .ok_or_else(|| Error::UnknownScm {
                        location: url.url(),
                    })?;
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                let invocation = scm.checkout_invocation(destination, url)?;
                log::info!("checking out {} into {}", url, destination.display());
                invocation.run_checked()?;
                Ok(())
            }
            Action::Remove { directory } => {
                log::info!("removing working copy {}", directory.display());
                fs::remove_dir_all(directory)?;
                Ok(())
            }
            Action::Problem { directory, reason } => {
                log::warn!("not touching {}: {}", directory.display(), reason);
                Ok(())
            }
        }
    }

    fn normalize(&self, location: &str) -> Result<ScmUrl> {
        let scm = self
            .registry
            .probe_url(location)
            .ok_or_else(|| Error::UnknownScm {
                location: location.to_string(),
            })?;
        scm.normalize(location)
    }

    fn require_location<'a>(
        &self,
        directory: &Path,
        location: Option<&'a str>,
    ) -> Result<&'a str> {
        location.ok_or_else(|| Error::MissingScm {
            origin: directory.display().to_string(),
        })
    }
}
