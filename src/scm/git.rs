//! Git backend.
//!
//! All operations go through the system `git` command, which automatically
//! handles SSH keys, credential helpers and anything else configured in the
//! user's `~/.gitconfig`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::scm::process::Invocation;
use crate::scm::url::{ScmKind, ScmUrl};
use crate::scm::Scm;

/// Hosts that serve git over plain `https://` URLs without a `.git` suffix.
const KNOWN_GIT_HOSTS: [&str; 2] = ["github.com", "gitlab.com"];

/// The Git backend. Stateless; safe to share across threads.
pub struct GitScm;

impl Scm for GitScm {
    fn kind(&self) -> ScmKind {
        ScmKind::Git
    }

    fn is_checkout(&self, dir: &Path) -> bool {
        dir.join(".git").is_dir()
    }

    fn recognizes(&self, location: &str) -> bool {
        if location.starts_with("git@") || location.starts_with("ssh://") {
            return true;
        }
        let trimmed = location.trim_end_matches('/');
        if trimmed.ends_with(".git") {
            return true;
        }
        match url::Url::parse(location) {
            Ok(parsed) => {
                parsed.scheme() == "https"
                    && parsed
                        .host_str()
                        .is_some_and(|host| KNOWN_GIT_HOSTS.contains(&host.to_ascii_lowercase().as_str()))
            }
            Err(_) => false,
        }
    }

    fn normalize(&self, location: &str) -> Result<ScmUrl> {
        ScmUrl::parse(ScmKind::Git, location)
    }

    fn remote_url(&self, checkout: &Path) -> Result<String> {
        let output = Invocation::new("git", checkout)
            .args(["config", "--get", "remote.origin.url"])
            .run_checked()?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn checkout_invocation(&self, destination: &Path, url: &ScmUrl) -> Result<Invocation> {
        let (parent, name) = split_destination(destination)?;
        Ok(Invocation::new("git", parent)
            .arg("clone")
            .arg(url.url())
            .arg(name))
    }

    fn is_alive(&self, checkout: &Path) -> bool {
        Invocation::new("git", checkout)
            .args(["fetch", "--dry-run"])
            .succeeds()
    }

    fn is_committed(&self, checkout: &Path) -> bool {
        // Only the current branch is compared against its upstream; local
        // work parked on other branches is not detected.
        let checks: [&[&str]; 3] = [
            &["diff", "--quiet"],
            &["diff", "--cached", "--quiet"],
            &["diff", "@{u}..HEAD", "--quiet"],
        ];
        checks
            .iter()
            .all(|args| Invocation::new("git", checkout).args(args.iter().copied()).succeeds())
    }
}

/// Split a destination path into the directory the clone runs in and the
/// name of the directory it creates.
pub(crate) fn split_destination(destination: &Path) -> Result<(&Path, String)> {
    let parent = destination.parent().ok_or_else(|| Error::Path {
        path: destination.to_path_buf(),
        message: "checkout destination has no parent directory".to_string(),
    })?;
    let name = destination
        .file_name()
        .ok_or_else(|| Error::Path {
            path: destination.to_path_buf(),
            message: "checkout destination has no directory name".to_string(),
        })?
        .to_string_lossy()
        .to_string();
    Ok((parent, name))
}
