use kcommit::{
    cli::run,
    errors::{ConfigError, GitError, KcommitError},
    utils::{print_error, print_warning},
};

fn main() {
    if let Err(error) = run() {
        report(&error);
        std::process::exit(1);
    }
}

fn report(error: &KcommitError) {
    match error {
        KcommitError::UserCancelled => {
            print_warning("Cancelled", "Nothing was committed.");
        }
        KcommitError::Git(GitError::RepositoryNotFound) => print_error(
            "Git repository not found",
            "Could not find a git repository in this directory or any parent directories.",
            "Please ensure you're in a Git repository.",
        ),
        KcommitError::History(_) => print_error(
            "Could not use the kcommit history",
            &error.to_string(),
            "Fix or delete ~/.kcommit/.kcommit_history.json, it is recreated on the next run.",
        ),
        KcommitError::Rules(_) => print_error(
            "Invalid .kcommitrc",
            &error.to_string(),
            "Expected: { \"commitTypes\": [ { \"type\": \"feat\", \"description\": \"...\" } ] }",
        ),
        KcommitError::Config(ConfigError::ConfigAlreadyExists { path }) => print_error(
            "Configuration file already exists",
            &format!("A configuration file already exists at {path}"),
            "Edit it directly, or delete it and run `kcommit init` again.",
        ),
        KcommitError::Config(_) => print_error(
            "Invalid configuration",
            &error.to_string(),
            "Check ~/.config/kcommit/config.toml and the KCOMMIT_* environment variables.",
        ),
        _ => print_error("kcommit failed", &error.to_string(), "Run again with --verbose for details."),
    }
}
