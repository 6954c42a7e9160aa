//! # Normalized Source-Control Identity
//!
//! This module defines `ScmUrl`, the immutable, normalized identity of a
//! source-control location. Location strings arrive in syntactically
//! divergent forms (`https://` URLs, `ssh://git@...` URLs, scp-like
//! `git@host:path` shorthand, Subversion trunk/branch paths), and the whole
//! catalog depends on mapping all spellings of the same logical repository
//! to one identity so it is never counted twice.
//!
//! ## Equivalence vs. rendering
//!
//! Two `ScmUrl` values are *equivalent* (`same`) when backend, host and
//! normalized path agree; the transport (ssh vs. https) is deliberately
//! ignored. The canonical rendering (`url`) does include the transport and
//! is used for display and de-duplication keys, never for equality.
//!
//! ## Layout folding
//!
//! For Subversion locations the trunk/branches layout convention is folded
//! away: `.../proj/trunk` and `.../proj/branches/proj-4` both normalize to
//! `.../proj`, so a project's mainline and branch working copies share one
//! identity.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The version-control backend a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmKind {
    Git,
    Subversion,
}

impl ScmKind {
    /// Short lowercase name, matching the command-line tool of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScmKind::Git => "git",
            ScmKind::Subversion => "svn",
        }
    }
}

impl fmt::Display for ScmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a Git location is reached. Ignored by equivalence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Ssh,
    Https,
}

/// Immutable, normalized identity for a source-control location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScmUrl {
    kind: ScmKind,
    transport: Transport,
    host: String,
    path: String,
}

impl ScmUrl {
    /// Normalize a raw location string into an `ScmUrl`.
    ///
    /// The algorithm:
    ///
    /// 1. Parse as a URI; on failure fall back to the scp-like
    ///    `git@host:path` form (which requires a `git` user segment).
    /// 2. A `git` user implies ssh transport and requires the `ssh` scheme;
    ///    no user requires the `https` scheme. Anything else is malformed.
    /// 3. Fragments and explicit ports are rejected outright.
    /// 4. The path is stripped of its leading slash, one trailing slash and
    ///    a trailing `.git`; an empty result is malformed.
    /// 5. Subversion paths additionally have their trunk/branches layout
    ///    suffix folded away.
    pub fn parse(kind: ScmKind, location: &str) -> Result<Self> {
        let (transport, host, raw_path) = match url::Url::parse(location) {
            Ok(parsed) => from_uri(location, &parsed)?,
            Err(_) => from_scp_form(location)?,
        };

        let path = scrub_path(location, &raw_path)?;
        let path = match kind {
            ScmKind::Subversion => fold_layout(&path),
            ScmKind::Git => path,
        };
        if path.is_empty() {
            return Err(malformed(location, "empty path"));
        }

        Ok(Self {
            kind,
            transport,
            host,
            path,
        })
    }

    /// The backend this location belongs to.
    pub fn kind(&self) -> ScmKind {
        self.kind
    }

    /// The transport the location was observed with.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Lowercased host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Normalized repository path: no affix slashes, no `.git` suffix, no
    /// trunk/branch segment.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether two locations identify the same logical repository.
    ///
    /// Transport is ignored: `ssh://git@github.com/x/y` and
    /// `https://github.com/x/y.git` are the same repository.
    pub fn same(&self, other: &ScmUrl) -> bool {
        self.kind == other.kind && self.host == other.host && self.path == other.path
    }

    /// Canonical rendering of the location.
    ///
    /// Used for display and de-duplication keys; use [`ScmUrl::same`] for
    /// identity comparisons.
    pub fn url(&self) -> String {
        match self.transport {
            Transport::Ssh => format!("ssh://git@{}/{}", self.host, self.path),
            Transport::Https => format!("https://{}/{}", self.host, self.path),
        }
    }

    /// The relative directory a working copy of this repository occupies
    /// under a mount root: `host/path`.
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(&self.host).join(&self.path)
    }
}

impl fmt::Display for ScmUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Fold the Subversion trunk/branches layout convention out of a path.
///
/// A trailing `trunk` segment is dropped; a trailing `branches/<name>` pair
/// is dropped. The result is the project's canonical path, shared by the
/// mainline and every branch.
pub fn fold_layout(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.last() == Some(&"trunk") {
        return segments[..segments.len() - 1].join("/");
    }
    if segments.len() >= 2 && segments[segments.len() - 2] == "branches" {
        return segments[..segments.len() - 2].join("/");
    }
    segments.join("/")
}

fn malformed(location: &str, message: impl Into<String>) -> Error {
    Error::MalformedLocation {
        location: location.to_string(),
        message: message.into(),
    }
}

/// Extract transport, host and raw path from a successfully parsed URI.
fn from_uri(location: &str, parsed: &url::Url) -> Result<(Transport, String, String)> {
    if parsed.fragment().is_some_and(|f| !f.is_empty()) {
        return Err(malformed(location, "fragment not supported"));
    }
    if parsed.port().is_some() {
        return Err(malformed(location, "explicit port not supported"));
    }

    let user = parsed.username();
    let transport = if user.eq_ignore_ascii_case("git") {
        if parsed.scheme() != "ssh" {
            return Err(malformed(location, "git user requires the ssh scheme"));
        }
        Transport::Ssh
    } else if user.is_empty() {
        if parsed.scheme() != "https" {
            return Err(malformed(
                location,
                format!("unsupported scheme `{}`", parsed.scheme()),
            ));
        }
        Transport::Https
    } else {
        return Err(malformed(location, "git user expected"));
    };

    let host = parsed
        .host_str()
        .ok_or_else(|| malformed(location, "missing host"))?
        .to_ascii_lowercase();

    let path = parsed.path();
    if !path.starts_with('/') {
        return Err(malformed(location, "path must be absolute"));
    }

    Ok((transport, host, path.to_string()))
}

/// Parse the scp-like `git@host:path` shorthand that git accepts without a
/// scheme. Only the `git` user is supported.
fn from_scp_form(location: &str) -> Result<(Transport, String, String)> {
    let (user, rest) = location
        .split_once('@')
        .ok_or_else(|| malformed(location, "git user expected"))?;
    if !user.eq_ignore_ascii_case("git") {
        return Err(malformed(location, "git user expected"));
    }
    let (host, path) = rest
        .split_once(':')
        .ok_or_else(|| malformed(location, "missing repository path"))?;
    if host.is_empty() {
        return Err(malformed(location, "missing host"));
    }
    Ok((
        Transport::Ssh,
        host.to_ascii_lowercase(),
        format!("/{}", path.trim_start_matches('/')),
    ))
}

/// Strip the leading slash, one trailing slash, and a trailing `.git`.
fn scrub_path(location: &str, path: &str) -> Result<String> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return Err(malformed(location, "empty path"));
    }
    Ok(path.to_string())
}
