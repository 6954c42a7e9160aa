//! External process descriptions.
//!
//! Backend operations that launch subprocesses describe them as
//! [`Invocation`] values instead of executing directly. The caller decides
//! whether to run, log, or merely display the invocation, which keeps the
//! plan/execute separation of the checkout lifecycle intact: a dry run can
//! show the exact `git clone` that *would* happen without touching the
//! filesystem.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// A runnable description of an external process: program, arguments and
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
}

impl Invocation {
    /// Describe a process that runs `program` inside `work_dir`.
    pub fn new(program: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: work_dir.into(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The working directory the process runs in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build the `std::process::Command` this invocation describes.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(&self.work_dir);
        command
    }

    /// The invocation as a single display string, e.g.
    /// `git clone https://github.com/x/y y`.
    pub fn rendered(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Run the process to completion, capturing its output.
    ///
    /// A non-zero exit is *not* an error here; callers that treat it as one
    /// use [`Invocation::run_checked`], callers probing for an expected
    /// negative (liveness, cleanliness) inspect the status themselves.
    pub fn run(&self) -> Result<Output> {
        log::debug!("running `{}` in {}", self.rendered(), self.work_dir.display());
        Ok(self.command().output()?)
    }

    /// Run the process and fail with [`Error::ScmCommand`] on a non-zero
    /// exit, carrying the captured stderr.
    pub fn run_checked(&self) -> Result<Output> {
        let output = self.run()?;
        if !output.status.success() {
            return Err(Error::ScmCommand {
                command: self.rendered(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }

    /// Run the process and report only whether it exited successfully.
    /// Spawn failures count as "no".
    pub fn succeeds(&self) -> bool {
        match self.run() {
            Ok(output) => output.status.success(),
            Err(_) => false,
        }
    }
}
