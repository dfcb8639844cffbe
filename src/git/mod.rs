//! Git Operations Module
//!
//! Everything kcommit asks of git goes through [`GitOperations`], so the
//! wizard can be tested without a repository. [`SystemGit`] is the real
//! implementation and shells out to the `git` binary.

pub mod commit;
pub mod repository;

use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use crate::errors::{GitError, Result};

/// Git operations used by kcommit.
#[cfg_attr(test, mockall::automock)]
pub trait GitOperations {
    /// Whether the working directory is inside a git repository.
    fn is_repository(&self) -> bool;

    /// Root of the working tree.
    ///
    /// # Errors
    /// * If not inside a git repository
    fn top_level_path(&self) -> Result<PathBuf>;

    /// Name of the checked out branch (`HEAD` when detached).
    ///
    /// # Errors
    /// * If git cannot resolve `HEAD`
    fn current_branch(&self) -> Result<String>;

    /// Runs `git commit` with `message` and returns git's output.
    ///
    /// # Errors
    /// * If git exits with a failure status
    fn commit(&self, message: &str, args: &[String], sign: bool) -> Result<String>;
}

/// [`GitOperations`] backed by the `git` executable, run from `work_dir`.
#[derive(Debug, Clone)]
pub struct SystemGit {
    work_dir: PathBuf,
}

impl SystemGit {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        SystemGit {
            work_dir: work_dir.into(),
        }
    }

    /// A `SystemGit` running from the process' current directory.
    ///
    /// # Errors
    /// * If the current directory cannot be read
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(args = ?args, dir = %self.work_dir.display(), "running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(GitError::IoError)?;

        Ok(output)
    }

    /// Runs git and returns its trimmed stdout, or `CommandFailed` with stderr.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }
}

impl GitOperations for SystemGit {
    fn is_repository(&self) -> bool {
        repository::find_git_root(self).is_ok()
    }

    fn top_level_path(&self) -> Result<PathBuf> {
        repository::get_top_level_path(self)
    }

    fn current_branch(&self) -> Result<String> {
        repository::get_current_branch(self)
    }

    fn commit(&self, message: &str, args: &[String], sign: bool) -> Result<String> {
        commit::git_commit(self, message, args, sign)
    }
}
