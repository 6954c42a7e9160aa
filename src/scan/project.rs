//! Project-root records and descriptor recognition.
//!
//! A directory (or remote tree node) is a *project root* when it directly
//! contains a recognizable descriptor file: a build manifest or package
//! descriptor. The descriptor that matched becomes the record's kind
//! discriminator; the first registered match wins and recursion stops, so
//! descendants of a recognized project are never scanned independently.

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A discovered project root, ready for the downstream indexer.
///
/// Once enqueued the record belongs to the consumer; scanners never retain
/// or mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoot {
    /// Origin identifier: an absolute URI or a local path.
    pub origin: String,
    /// Revision marker: a last-modified timestamp or a VCS revision number.
    pub revision: String,
    /// Canonical SCM location, absent for loosely-typed discovery sources
    /// (plain directory trees, artifact listings).
    pub scm_url: Option<String>,
    /// Which descriptor matched, e.g. `maven` or `cargo`.
    pub kind: String,
}

/// One registered descriptor: a kind name plus the file-name pattern that
/// identifies it.
#[derive(Debug, Clone)]
pub struct Descriptor {
    kind: String,
    pattern: Pattern,
}

impl Descriptor {
    pub fn new(kind: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Self {
            kind: kind.into(),
            pattern: Pattern::new(pattern)?,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The pattern as written, usable as a concrete file path when it
    /// contains no wildcard.
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the pattern is a literal file name rather than a glob.
    pub fn is_literal(&self) -> bool {
        !self.pattern.as_str().contains(['*', '?', '['])
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.matches(file_name)
    }
}

/// Ordered descriptor registry; earlier entries win.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    entries: Vec<Descriptor>,
}

impl DescriptorSet {
    /// The built-in descriptor table.
    pub fn builtin() -> Self {
        let entries = [
            ("maven", "pom.xml"),
            ("gradle", "build.gradle"),
            ("node", "package.json"),
            ("cargo", "Cargo.toml"),
        ]
        .into_iter()
        .map(|(kind, pattern)| {
            Descriptor::new(kind, pattern).expect("builtin descriptor patterns are valid")
        })
        .collect();
        Self { entries }
    }

    /// Build a registry from explicit `(kind, pattern)` pairs, appended to
    /// the built-in table.
    pub fn with_extras<'a, I>(extras: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::builtin();
        for (kind, pattern) in extras {
            set.entries.push(Descriptor::new(kind, pattern).map_err(|_| {
                Error::UnsupportedOption {
                    option: format!("descriptor:{kind}"),
                    message: format!("invalid descriptor pattern {pattern:?}"),
                }
            })?);
        }
        Ok(set)
    }

    pub fn entries(&self) -> &[Descriptor] {
        &self.entries
    }

    /// Classify a file name; the first matching descriptor's kind wins.
    pub fn classify(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|descriptor| descriptor.matches(file_name))
            .map(Descriptor::kind)
    }
}

impl Default for DescriptorSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_classifies_known_descriptors() {
        let set = DescriptorSet::builtin();
        assert_eq!(set.classify("pom.xml"), Some("maven"));
        assert_eq!(set.classify("package.json"), Some("node"));
        assert_eq!(set.classify("Cargo.toml"), Some("cargo"));
        assert_eq!(set.classify("README.md"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let set = DescriptorSet::with_extras([("everything", "*")]).unwrap();
        // The wildcard entry is appended after the builtins.
        assert_eq!(set.classify("pom.xml"), Some("maven"));
        assert_eq!(set.classify("anything.else"), Some("everything"));
    }

    #[test]
    fn test_extras_with_glob_patterns() {
        let set = DescriptorSet::with_extras([("sbt", "*.sbt")]).unwrap();
        assert_eq!(set.classify("build.sbt"), Some("sbt"));
        assert_eq!(set.classify("build.sbtx"), None);
    }

    #[test]
    fn test_invalid_extra_pattern_fails_fast() {
        let err = DescriptorSet::with_extras([("broken", "a[")]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOption { .. }));
    }

    #[test]
    fn test_literal_detection() {
        assert!(Descriptor::new("maven", "pom.xml").unwrap().is_literal());
        assert!(!Descriptor::new("sbt", "*.sbt").unwrap().is_literal());
    }

    #[test]
    fn test_project_root_serializes_without_scm_url() {
        let root = ProjectRoot {
            origin: "/srv/projects/puc".to_string(),
            revision: "2026-08-07T00:00:00Z".to_string(),
            scm_url: None,
            kind: "maven".to_string(),
        };
        let json = serde_json::to_string(&root).unwrap();
        assert!(json.contains("\"origin\""));
        assert!(json.contains("null"));
    }
}
