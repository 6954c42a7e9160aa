//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `repo-scout` command-line tool. Each subcommand is defined in its own
//! file to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic, calling into the `repo_scout` library for the core
//!   work.

pub mod checkout;
pub mod completions;
pub mod remove;
pub mod scan;
pub mod status;
