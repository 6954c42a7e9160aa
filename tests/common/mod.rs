//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_svn_layout("puc");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
#[allow(unused_imports)]
pub mod prelude {
    pub use assert_cmd::Command;
    pub use assert_fs::prelude::*;
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    pub use super::repo_scout_cmd;
    pub use super::TestFixture;
}

/// Get a Command for the repo-scout binary
#[allow(dead_code)]
pub fn repo_scout_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("repo-scout").unwrap()
}

/// A temporary directory tree for scan and checkout tests.
pub struct TestFixture {
    pub temp: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp: assert_fs::TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// The fixture root as a `file:` root designator.
    pub fn root_designator(&self) -> String {
        format!("file:{}", self.temp.path().display())
    }

    /// Add a project directory holding the given descriptor file.
    pub fn with_project(self, rel: &str, descriptor: &str) -> Self {
        self.temp
            .child(format!("{rel}/{descriptor}"))
            .write_str("")
            .unwrap();
        self
    }

    /// Add a trunk/branches Subversion-style layout: a trunk and two
    /// branches each holding a `pom.xml`, plus a `src` sibling that must
    /// never be reported on its own.
    pub fn with_svn_layout(self, project: &str) -> Self {
        for dir in ["trunk", "branches/x-1", "branches/x-2"] {
            self.temp
                .child(format!("{project}/{dir}/pom.xml"))
                .write_str("")
                .unwrap();
        }
        self.temp
            .child(format!("{project}/src/main.c"))
            .write_str("")
            .unwrap();
        self
    }

    /// Add a directory that looks like a git working copy (marker
    /// directory only; no usable repository behind it).
    pub fn with_fake_git_checkout(self, rel: &str) -> Self {
        self.temp
            .child(format!("{rel}/.git"))
            .create_dir_all()
            .unwrap();
        self.temp
            .child(format!("{rel}/tracked.txt"))
            .write_str("content")
            .unwrap();
        self
    }
}
