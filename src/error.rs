//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `repo-scout` application. It uses the `thiserror` library to create a
//! single `Error` enum covering all anticipated failure modes, providing
//! clear and descriptive error messages.
//!
//! A few variants deserve a note on intent:
//!
//! - **`MalformedLocation`** is always surfaced to the caller and never
//!   silently skipped: a location that cannot be normalized means two
//!   repositories could be falsely treated as distinct (or as the same).
//!
//! - **`UnsupportedOption`** is raised at configuration time, before any
//!   scanning starts, so a bad scanner setup never produces a partial scan.
//!
//! - **`ScmCommand`** covers *unexpected* subprocess failures. Expected
//!   negative results (an unreachable remote during a liveness probe, a
//!   dirty working copy) are reported as plain booleans by the backends,
//!   not as errors.
//!
//! - **`ScanInterrupted`** is raised when a scanner blocked on a full
//!   queue discovers the consumer has gone away. It always propagates so
//!   a caller can abort a long-running scan.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for repo-scout operations
#[derive(Error, Debug)]
pub enum Error {
    /// A source-control location could not be normalized.
    #[error("malformed location {location:?}: {message}")]
    MalformedLocation { location: String, message: String },

    /// A scanner was configured with an option it does not understand.
    #[error("unsupported scanner option {option:?}: {message}")]
    UnsupportedOption { option: String, message: String },

    /// An SCM subprocess exited unexpectedly.
    #[error("scm command failed: {command}: {stderr}")]
    ScmCommand { command: String, stderr: String },

    /// A project record carries no source-control location.
    #[error("project {origin:?} has no scm location")]
    MissingScm { origin: String },

    /// No registered backend recognizes the location.
    #[error("no scm backend recognizes {location:?}")]
    UnknownScm { location: String },

    /// A root designator does not match any known source prefix.
    #[error("unknown root designator {designator:?} (expected file:, svn:, github: or artifactory:)")]
    UnknownRoot { designator: String },

    /// The consumer side of the discovery queue went away while a scanner
    /// was still producing.
    #[error("scan interrupted: the discovery queue consumer went away")]
    ScanInterrupted,

    /// An error occurred while parsing the `.repo-scout.yaml` configuration file.
    #[error("configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A remote listing API returned an unusable response.
    #[error("listing error for {url}: {message}")]
    Listing { url: String, message: String },

    /// An error occurred with a path-related operation.
    #[error("path operation error: {}: {message}", path.display())]
    Path { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// An HTTP transport error, wrapped from `reqwest::Error`.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_location_display() {
        let error = Error::MalformedLocation {
            location: "github.com:x/y.git".to_string(),
            message: "git user expected".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("malformed location"));
        assert!(display.contains("github.com:x/y.git"));
        assert!(display.contains("git user expected"));
    }

    #[test]
    fn test_unsupported_option_display() {
        let error = Error::UnsupportedOption {
            option: "depth".to_string(),
            message: "not a crawler setting".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("unsupported scanner option"));
        assert!(display.contains("depth"));
    }

    #[test]
    fn test_scm_command_display() {
        let error = Error::ScmCommand {
            command: "git config --get remote.origin.url".to_string(),
            stderr: "fatal: not a git repository".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("scm command failed"));
        assert!(display.contains("remote.origin.url"));
        assert!(display.contains("not a git repository"));
    }

    #[test]
    fn test_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "unknown field `rots`".to_string(),
            hint: Some("did you mean `roots`?".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("configuration parsing error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("roots"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("no such directory"));
    }

    #[test]
    fn test_error_from_glob_error() {
        let glob_error = glob::Pattern::new("a[").unwrap_err();
        let error: Error = glob_error.into();
        let display = format!("{}", error);
        assert!(display.contains("glob pattern error"));
    }

    #[test]
    fn test_scan_interrupted_display() {
        let display = format!("{}", Error::ScanInterrupted);
        assert!(display.contains("scan interrupted"));
    }
}
