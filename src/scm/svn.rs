//! Subversion backend.
//!
//! Operations go through the system `svn` command. Every invocation carries
//! `--non-interactive --trust-server-cert` so a scan can never stall on a
//! certificate or password prompt.

use std::path::Path;

use crate::error::Result;
use crate::scm::process::Invocation;
use crate::scm::url::{ScmKind, ScmUrl};
use crate::scm::Scm;

/// Arguments prepended to every `svn` call.
pub(crate) const SVN_GLOBAL_ARGS: [&str; 2] = ["--non-interactive", "--trust-server-cert"];

/// Status lines that do not count as local modifications: externals and the
/// banner svn prints before listing an external's status.
const EXTERNAL_STATUS_PREFIX: char = 'X';
const EXTERNAL_BANNER: &str = "Performing status on external item";

/// The Subversion backend. Stateless; safe to share across threads.
pub struct SubversionScm;

/// Layout segments that mark a Subversion repository path.
const LAYOUT_SEGMENTS: [&str; 3] = ["trunk", "branches", "tags"];

impl Scm for SubversionScm {
    fn kind(&self) -> ScmKind {
        ScmKind::Subversion
    }

    fn is_checkout(&self, dir: &Path) -> bool {
        dir.join(".svn").is_dir()
    }

    fn recognizes(&self, location: &str) -> bool {
        if location.starts_with("svn://") || location.starts_with("svn+ssh://") {
            return true;
        }
        match url::Url::parse(location) {
            Ok(parsed) => {
                let svn_host = parsed
                    .host_str()
                    .is_some_and(|host| host.to_ascii_lowercase().contains("svn"));
                let layout_path = parsed
                    .path()
                    .split('/')
                    .any(|segment| LAYOUT_SEGMENTS.contains(&segment));
                svn_host || layout_path
            }
            Err(_) => false,
        }
    }

    fn normalize(&self, location: &str) -> Result<ScmUrl> {
        ScmUrl::parse(ScmKind::Subversion, location)
    }

    fn remote_url(&self, checkout: &Path) -> Result<String> {
        let output = svn_in(checkout)
            .args(["info", "--show-item", "url"])
            .run_checked()?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn checkout_invocation(&self, destination: &Path, url: &ScmUrl) -> Result<Invocation> {
        let (parent, name) = crate::scm::git::split_destination(destination)?;
        Ok(svn_in(parent).arg("checkout").arg(url.url()).arg(name))
    }

    fn is_alive(&self, checkout: &Path) -> bool {
        // `-r HEAD` forces a round-trip to the server.
        svn_in(checkout).args(["info", "-r", "HEAD"]).succeeds()
    }

    fn is_committed(&self, checkout: &Path) -> bool {
        let output = match svn_in(checkout).arg("status").run() {
            Ok(output) if output.status.success() => output,
            _ => return false,
        };
        let stdout = String::from_utf8_lossy(&output.stdout);
        is_clean_status(&stdout)
    }
}

fn svn_in(work_dir: &Path) -> Invocation {
    Invocation::new("svn", work_dir).args(SVN_GLOBAL_ARGS)
}

/// Whether `svn status` output shows no local modifications.
///
/// External items (`X` lines) and the banner svn prints while descending
/// into externals are not modifications.
pub(crate) fn is_clean_status(status: &str) -> bool {
    status
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.starts_with(EXTERNAL_STATUS_PREFIX))
        .filter(|line| !line.starts_with(EXTERNAL_BANNER))
        .count()
        == 0
}
