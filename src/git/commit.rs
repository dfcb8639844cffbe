//! Commit Operations

use crate::errors::{GitError, Result};

use super::SystemGit;

/// Commits the staged changes with `message`.
///
/// Extra `args` are appended to the command. Any `-m`/`--message` given there,
/// with its value, is dropped in favour of the composed message.
///
/// # Arguments
/// * `message` - The commit message
/// * `args` - Additional arguments for `git commit`
/// * `sign` - Whether to sign the commit with `-S`
///
/// # Errors
/// * If git cannot be run or exits with a failure status
///
/// # Returns
/// Git's combined stdout and stderr, trimmed
pub fn git_commit(git: &SystemGit, message: &str, args: &[String], sign: bool) -> Result<String> {
    let mut command_args: Vec<&str> = vec!["commit"];

    if sign {
        command_args.push("-S");
    }

    command_args.extend(["-m", message]);
    command_args.extend(without_message_args(args));

    let output = git.output(&command_args)?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
    .trim()
    .to_string();

    if output.status.success() {
        tracing::debug!("commit successful");
        Ok(combined)
    } else {
        Err(GitError::CommandFailed {
            command: "git commit".to_string(),
            output: combined,
        }
        .into())
    }
}

/// Drops `-m <msg>`, `--message <msg>`, `-m<msg>` and `--message=<msg>`.
fn without_message_args(args: &[String]) -> Vec<&str> {
    let mut kept = Vec::with_capacity(args.len());
    let mut iter = args.iter().map(String::as_str);

    while let Some(arg) = iter.next() {
        match arg {
            "-m" | "--message" => {
                iter.next();
            }
            _ if arg.starts_with("-m") || arg.starts_with("--message=") => {}
            _ => kept.push(arg),
        }
    }

    kept
}
