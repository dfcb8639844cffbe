use std::io;

use chrono::{Local, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::{
    config::{Config, Settings},
    errors::Result,
    git::SystemGit,
    history::HistoryFile,
    logging,
    prompt::InquirePrompter,
    runner::{Runner, ScopeAction, WizardOptions, WizardOutcome},
    utils::{format_list, print_commit_message, print_info, print_success, print_warning},
};

#[derive(Subcommand)]
enum Commands {
    /// List the scopes remembered for every project and branch
    #[command(short_flag = 'H')]
    History,

    /// Show, set or reset the scope of the current branch
    Scope {
        /// New scope for the current branch
        #[arg(long, value_name = "SCOPE", conflicts_with = "reset")]
        set: Option<String>,

        /// Forget the scope, so the next commit asks for it again
        #[arg(long, default_value_t = false)]
        reset: bool,
    },

    /// Forget branches that have not been used within the retention period
    Clean,

    /// Create the configuration file with default settings
    Init,

    /// Print shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Answers that can be given up front instead of through the prompts.
#[derive(Args, Default)]
struct WizardArgs {
    /// Scope to use for this commit (remembered for the branch)
    #[arg(long, value_name = "SCOPE")]
    scope: Option<String>,

    /// Commit type, as listed in `.kcommitrc` or the defaults
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    commit_type: Option<String>,

    /// Commit description
    #[arg(short, long, value_name = "MESSAGE")]
    message: Option<String>,

    /// Only print the commit message
    #[arg(short = 'n', long, default_value_t = false)]
    dry_run: bool,

    /// Commit without asking for confirmation
    #[arg(short, long, default_value_t = false)]
    yes: bool,

    /// Do not sign the commit, even if `sign_commits` is enabled
    #[arg(short, long, default_value_t = false)]
    unsigned: bool,

    /// Additional arguments to pass to `git commit`, after `--`
    #[arg(last = true, value_name = "ARGS")]
    git_args: Vec<String>,
}

impl From<WizardArgs> for WizardOptions {
    fn from(args: WizardArgs) -> Self {
        WizardOptions {
            scope: args.scope,
            commit_type: args.commit_type,
            message: args.message,
            dry_run: args.dry_run,
            yes: args.yes,
            unsigned: args.unsigned,
            git_args: args.git_args,
        }
    }
}

#[derive(Parser)]
#[command(about = "Compose conventional commit messages interactively.\n\
\tThe scope chosen for a branch is remembered for the next commits.")]
#[command(author)]
#[command(help_template = "{about}\nMade by: {author}\n\nUSAGE:\n{usage}\n\n{all-args}\n")]
#[command(name = "kcommit", version)]
pub struct Cli {
    /// Commands. Without one, the commit wizard runs.
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    wizard: WizardArgs,

    /// Verbose
    /// Print debug logs to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

/// # `run`
/// Runs the program.
///
/// ## Errors
/// Returns an error if the command fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Some(Commands::Completion { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "kcommit", &mut io::stdout());
        return Ok(());
    }

    let config = Config::new()?;

    if matches!(cli.command, Some(Commands::Init)) {
        let path = config.create_config_file()?;
        print_success("Configuration file created", &path.display().to_string());
        return Ok(());
    }

    let settings = config.load_settings()?;
    let history_file = config.history_file(&settings);

    match cli.command {
        None => commit(history_file, settings, cli.wizard.into()),
        Some(Commands::Scope { set, reset }) => {
            let action = match (set, reset) {
                (Some(scope), _) => ScopeAction::Set(scope),
                (None, true) => ScopeAction::Reset,
                (None, false) => ScopeAction::Show,
            };
            scope(history_file, settings, &action)
        }
        Some(Commands::History) => history(&history_file),
        Some(Commands::Clean) => clean(&history_file, &settings),
        Some(Commands::Init | Commands::Completion { .. }) => Ok(()),
    }
}

fn commit(history_file: HistoryFile, settings: Settings, options: WizardOptions) -> Result<()> {
    let git = SystemGit::from_current_dir()?;
    let prompter = InquirePrompter::new(settings.page_size);
    let runner = Runner::new(&git, &prompter, history_file, settings);

    match runner.run(&options, Utc::now())? {
        WizardOutcome::Committed { message, output } => {
            print_success("Committed", &message);
            if !output.is_empty() {
                print_commit_message(&output);
            }
        }
        WizardOutcome::Printed { message } => print_commit_message(&message),
    }

    Ok(())
}

fn scope(history_file: HistoryFile, settings: Settings, action: &ScopeAction) -> Result<()> {
    let git = SystemGit::from_current_dir()?;
    let prompter = InquirePrompter::new(settings.page_size);
    let runner = Runner::new(&git, &prompter, history_file, settings);

    let report = runner.scope(action, Utc::now())?;
    let target = format!("{} on {}", report.project, report.branch);

    match (action, report.scope) {
        (ScopeAction::Reset, _) => print_success("Scope reset", &target),
        (_, Some(scope)) => println!("{scope}"),
        (_, None) => print_info(
            "No scope defined yet",
            &format!("{target} will ask for one on the next commit"),
        ),
    }

    Ok(())
}

fn history(history_file: &HistoryFile) -> Result<()> {
    let store = history_file.load()?;

    if store.is_empty() {
        print_info(
            "History is empty",
            &history_file.path().display().to_string(),
        );
        return Ok(());
    }

    let lines: Vec<String> = store
        .entries()
        .map(|(project, branch, entry)| {
            let scope = if entry.scope.is_empty() {
                "<none>"
            } else {
                entry.scope.as_str()
            };
            format!(
                "{project} / {branch}: {scope} (last used {})",
                entry.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            )
        })
        .collect();

    println!("{}", format_list(&lines));

    Ok(())
}

fn clean(history_file: &HistoryFile, settings: &Settings) -> Result<()> {
    let mut store = history_file.load()?;
    let evicted = store.clean_old_branches(Utc::now(), settings.retention_months);

    if evicted.is_empty() {
        print_info(
            "Nothing to clean",
            &format!(
                "Every branch was used within the last {} month(s)",
                settings.retention_months
            ),
        );
        return Ok(());
    }

    history_file.save(&store)?;

    let removed: Vec<String> = evicted
        .iter()
        .map(|(project, branch)| format!("{project} / {branch}"))
        .collect();

    if store.is_empty() {
        print_warning("History emptied", "No branch was used recently");
    }

    print_success(
        &format!("Forgot {} branch(es)", removed.len()),
        &format_list(&removed),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_wizard_flags() {
        let cli = Cli::try_parse_from([
            "kcommit",
            "-t",
            "fix",
            "--scope",
            "api",
            "-m",
            "handle 404",
            "-y",
            "--",
            "--no-verify",
            "--amend",
        ])
        .unwrap();

        assert!(cli.command.is_none());
        let options = WizardOptions::from(cli.wizard);
        assert_eq!(options.commit_type.as_deref(), Some("fix"));
        assert_eq!(options.scope.as_deref(), Some("api"));
        assert_eq!(options.message.as_deref(), Some("handle 404"));
        assert!(options.yes);
        assert_eq!(
            options.git_args,
            vec!["--no-verify".to_string(), "--amend".to_string()]
        );
    }

    #[test]
    fn test_git_args_need_separator() {
        let cli = Cli::try_parse_from(["kcommit", "-t", "fix"]).unwrap();
        assert!(cli.wizard.git_args.is_empty());

        assert!(Cli::try_parse_from(["kcommit", "-t", "fix", "--no-verify"]).is_err());
    }

    #[test]
    fn test_scope_subcommand() {
        let cli = Cli::try_parse_from(["kcommit", "scope", "--set", "core"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Scope { set: Some(ref s), reset: false }) if s == "core"
        ));

        assert!(Cli::try_parse_from(["kcommit", "scope", "--set", "core", "--reset"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["kcommit", "history", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::History)));

        let cli = Cli::try_parse_from(["kcommit", "-v", "clean"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::Clean)));
    }
}
