//! Repository Operations
//!
//! Repository detection, path resolution and branch lookup.

use std::path::{Path, PathBuf};

use crate::errors::{GitError, Result};

use super::SystemGit;

/// Finds the `.git` directory of the repository containing the work dir.
///
/// Works from any subdirectory of the repository.
///
/// # Errors
/// * `GitError::RepositoryNotFound` if git does not report a repository, or
///   the reported directory does not exist
pub fn find_git_root(git: &SystemGit) -> Result<PathBuf> {
    let git_dir = git
        .run(&["rev-parse", "--git-dir"])
        .map_err(|_| GitError::RepositoryNotFound)?;

    let git_dir = git.work_dir().join(git_dir);

    if git_dir.exists() {
        Ok(git_dir)
    } else {
        Err(GitError::RepositoryNotFound.into())
    }
}

/// Retrieves the top-level path of the working tree.
///
/// # Errors
/// * `GitError::RepositoryNotFound` if not inside a repository
pub fn get_top_level_path(git: &SystemGit) -> Result<PathBuf> {
    let top_level = git
        .run(&["rev-parse", "--show-toplevel"])
        .map_err(|_| GitError::RepositoryNotFound)?;

    Ok(PathBuf::from(top_level))
}

/// Gets the current branch name.
///
/// A repository without commits has no resolvable `HEAD` for `rev-parse`, so
/// the branch `HEAD` points to is read with `symbolic-ref` instead.
///
/// # Errors
/// * If neither command can determine the branch
pub fn get_current_branch(git: &SystemGit) -> Result<String> {
    match git.run(&["rev-parse", "--abbrev-ref", "HEAD"]) {
        Ok(branch) => Ok(branch),
        Err(rev_parse_error) => {
            tracing::debug!("rev-parse failed, falling back to symbolic-ref");
            git.run(&["symbolic-ref", "--short", "HEAD"])
                .map_err(|_| rev_parse_error)
        }
    }
}

/// Name under which a repository is recorded in the history: the last
/// component of its top-level path.
///
/// # Errors
/// * `GitError::InvalidProjectPath` if the path has no usable final component
pub fn project_name(top_level: &Path) -> Result<String> {
    top_level
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            GitError::InvalidProjectPath {
                path: top_level.display().to_string(),
            }
            .into()
        })
}
