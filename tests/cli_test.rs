use std::{fs, path::Path, process};

use assert_cmd::Command;
use tempfile::TempDir;

fn kcommit(home: &Path, dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kcommit").unwrap();
    cmd.current_dir(dir)
        .env("KCOMMIT_HOME", home)
        .env_remove("KCOMMIT_HISTORY_DIR")
        .env_remove("KCOMMIT_LOG");
    cmd
}

fn stdout(output: &process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Initializes a repository in `dir`; false when git is unavailable.
fn init_repo(dir: &Path) -> bool {
    let ok = |args: &[&str]| {
        process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .is_ok_and(|output| output.status.success())
    };

    ok(&["init", "--quiet"]) && ok(&["symbolic-ref", "HEAD", "refs/heads/feature/parser"])
}

fn history_path(home: &Path) -> std::path::PathBuf {
    home.join(".kcommit").join(".kcommit_history.json")
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    let output = kcommit(home.path(), home.path())
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Compose conventional commit messages"));
    assert!(text.contains("history"));
    assert!(text.contains("--dry-run"));
    assert!(text.contains("Made by: The kcommit contributors"));
    assert!(!text.contains("Planche"));
}

#[test]
fn test_completion() {
    let home = TempDir::new().unwrap();
    let output = kcommit(home.path(), home.path())
        .args(["completion", "bash"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("kcommit"));
}

#[test]
fn test_init_creates_config_once() {
    let home = TempDir::new().unwrap();

    let first = kcommit(home.path(), home.path()).arg("init").output().unwrap();
    assert!(first.status.success());
    assert!(
        home.path()
            .join(".config")
            .join("kcommit")
            .join("config.toml")
            .is_file()
    );

    let second = kcommit(home.path(), home.path()).arg("init").output().unwrap();
    assert_eq!(second.status.code(), Some(1));
    assert!(stderr(&second).contains("already exists"));
}

#[test]
fn test_empty_history() {
    let home = TempDir::new().unwrap();
    let output = kcommit(home.path(), home.path())
        .arg("history")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("History is empty"));
}

#[test]
fn test_history_lists_entries() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".kcommit")).unwrap();
    fs::write(
        history_path(home.path()),
        r#"{ "projects": [ { "name": "kcommit", "branches": [
            { "name": "main", "scope": "core", "updated_at": "2024-12-01T12:00:00Z" }
        ] } ] }"#,
    )
    .unwrap();

    let output = kcommit(home.path(), home.path())
        .arg("history")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("kcommit / main: core"));
}

#[test]
fn test_malformed_history() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".kcommit")).unwrap();
    fs::write(history_path(home.path()), "{ not json").unwrap();

    let output = kcommit(home.path(), home.path())
        .arg("history")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Could not use the kcommit history"));
}

#[test]
fn test_clean_forgets_stale_branches() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".kcommit")).unwrap();
    fs::write(
        history_path(home.path()),
        r#"{ "projects": [ { "name": "legacy", "branches": [
            { "name": "main", "scope": "old", "updated_at": "2001-01-01T00:00:00Z" }
        ] } ] }"#,
    )
    .unwrap();

    let output = kcommit(home.path(), home.path())
        .arg("clean")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("legacy / main"));

    let content = fs::read_to_string(history_path(home.path())).unwrap();
    assert!(!content.contains("legacy"));
}

#[test]
fn test_outside_repository() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    // Only meaningful when the temp dir is not inside a repository.
    let inside_repo = process::Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(work.path())
        .output()
        .is_ok_and(|output| output.status.success());
    if inside_repo {
        return;
    }

    let output = kcommit(home.path(), work.path())
        .args(["-t", "feat", "--scope", "core", "-m", "add x", "--dry-run"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Git repository not found"));
}

#[test]
fn test_dry_run_remembers_scope() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let project = work.path().join("parser-project");
    fs::create_dir(&project).unwrap();

    if !init_repo(&project) {
        return;
    }

    let output = kcommit(home.path(), &project)
        .args(["-t", "feat", "--scope", "lexer", "-m", "support raw strings", "-n"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("feat(lexer): support raw strings"));

    let scope = kcommit(home.path(), &project)
        .arg("scope")
        .output()
        .unwrap();
    assert!(scope.status.success());
    assert_eq!(stdout(&scope).trim(), "lexer");

    let content = fs::read_to_string(history_path(home.path())).unwrap();
    assert!(content.contains("\"parser-project\""));
    assert!(content.contains("\"feature/parser\""));

    let reset = kcommit(home.path(), &project)
        .args(["scope", "--reset"])
        .output()
        .unwrap();
    assert!(reset.status.success());

    let content = fs::read_to_string(history_path(home.path())).unwrap();
    assert!(!content.contains("parser-project"));
}

#[test]
fn test_unknown_commit_type_is_rejected() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    if !init_repo(work.path()) {
        return;
    }

    let output = kcommit(home.path(), work.path())
        .args(["-t", "feature", "--scope", "core", "-m", "x", "-n"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown commit type 'feature'"));
}

#[test]
fn test_history_without_branches_is_empty() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".kcommit")).unwrap();
    fs::write(
        history_path(home.path()),
        r#"{ "projects": [ { "name": "ghost", "branches": [] } ] }"#,
    )
    .unwrap();

    let output = kcommit(home.path(), home.path())
        .arg("history")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("History is empty"));
}

#[test]
fn test_retention_from_environment() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join(".kcommit")).unwrap();
    fs::write(
        history_path(home.path()),
        r#"{ "projects": [ { "name": "legacy", "branches": [
            { "name": "main", "scope": "old", "updated_at": "2000-01-01T00:00:00Z" }
        ] } ] }"#,
    )
    .unwrap();

    let output = kcommit(home.path(), home.path())
        .env("KCOMMIT_RETENTION_MONTHS", "1000")
        .arg("clean")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Nothing to clean"));

    let content = fs::read_to_string(history_path(home.path())).unwrap();
    assert!(content.contains("legacy"));
}

#[test]
fn test_environment_overrides_config_file() {
    let home = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();

    let config_dir = home.path().join(".config").join("kcommit");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        format!("history_dir = {:?}\n", home.path().join("unused").display().to_string()),
    )
    .unwrap();

    fs::write(
        elsewhere.path().join(".kcommit_history.json"),
        r#"{ "projects": [ { "name": "moved", "branches": [
            { "name": "main", "scope": "env", "updated_at": "2024-12-01T12:00:00Z" }
        ] } ] }"#,
    )
    .unwrap();

    let output = kcommit(home.path(), home.path())
        .env("KCOMMIT_HISTORY_DIR", elsewhere.path())
        .arg("history")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("moved / main: env"));
}

#[test]
fn test_trailing_args_reach_git_commit() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    if !init_repo(work.path()) {
        return;
    }
    for (key, value) in [
        ("user.name", "kcommit"),
        ("user.email", "kcommit@example.com"),
        ("commit.gpgsign", "false"),
    ] {
        process::Command::new("git")
            .args(["config", key, value])
            .current_dir(work.path())
            .output()
            .unwrap();
    }

    let output = kcommit(home.path(), work.path())
        .args(["-t", "chore", "--scope", "ci", "-m", "empty run", "-y"])
        .args(["--", "--allow-empty", "-m", "ignored"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));

    let log = process::Command::new("git")
        .args(["log", "-1", "--format=%B"])
        .current_dir(work.path())
        .output()
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&log.stdout).trim(),
        "chore(ci): empty run"
    );
}
