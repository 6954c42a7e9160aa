//! # Repo Scout Library
//!
//! This library provides the core functionality for cataloging software
//! projects scattered across heterogeneous version-control systems and
//! hosting APIs. It is designed to be used by the `repo-scout`
//! command-line tool but can also be integrated into other applications
//! that need repository discovery or working-copy management.
//!
//! ## Quick Example
//!
//! ```
//! use repo_scout::scm::{ScmKind, ScmUrl};
//!
//! // The same logical repository, three spellings:
//! let https = ScmUrl::parse(ScmKind::Git, "https://github.com/acme/jsma.git").unwrap();
//! let ssh = ScmUrl::parse(ScmKind::Git, "ssh://git@github.com/acme/jsma").unwrap();
//! let scp = ScmUrl::parse(ScmKind::Git, "git@github.com:acme/jsma.git").unwrap();
//!
//! assert!(https.same(&ssh));
//! assert!(https.same(&scp));
//! assert_eq!(https.url(), "https://github.com/acme/jsma");
//! ```
//!
//! ## Core Concepts
//!
//! - **Normalized identity (`scm::url`)**: every observed location string
//!   collapses into an `ScmUrl`, so one logical repository is never
//!   counted twice no matter how it was spelled.
//! - **Backends (`scm`)**: Git and Subversion behind one trait, selected
//!   by probing (marker directories, URL recognizers) in fixed priority
//!   order, never by configuration.
//! - **Discovery sources (`scan`)**: strategies that walk a root (a
//!   directory tree, a remote Subversion tree, a GitHub owner, an
//!   Artifactory repository) and feed recognized project roots into a
//!   bounded queue.
//! - **Checkout lifecycle (`checkout`)**: computes where a project's
//!   working copy lives under a mount root and plans create/remove
//!   actions, strictly separated from executing them.
//!
//! ## Execution Flow
//!
//! A scan classifies each root designator to a source, walks it applying
//! the trunk/branches layout heuristics, and pushes each project root onto
//! the queue; the consumer (an indexer, the CLI printer) drains the queue
//! at its own pace, with the bounded capacity providing backpressure.
//! Independently, the checkout lifecycle reconciles a project's canonical
//! location against whatever already exists on disk.

pub mod checkout;
pub mod config;
pub mod defaults;
pub mod error;
pub mod output;
pub mod scan;
pub mod scm;

#[cfg(test)]
mod url_proptest;
