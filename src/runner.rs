//! Commit Wizard
//!
//! Drives the interactive flow: resolve the branch scope (asking for it the
//! first time a branch is seen), pick a commit type, write the description,
//! then commit or just print the resulting `type(scope): description`.

use chrono::{DateTime, Utc};

use crate::{
    config::Settings,
    errors::{GitError, KcommitError, Result},
    git::{GitOperations, repository::project_name},
    history::{HistoryFile, HistoryStore},
    prompt::{Choice, Prompter, validate_input},
    rules::CommitRules,
};

const SCOPE_FROM_BRANCH: &str = "branch";
const SCOPE_CUSTOM: &str = "custom";
const ACTION_COMMIT: &str = "commit";
const ACTION_PRINT: &str = "just print";

/// Answers given on the command line instead of through prompts.
#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    /// Scope to use (and remember) for the current branch.
    pub scope: Option<String>,
    pub commit_type: Option<String>,
    pub message: Option<String>,
    /// Print the message without committing.
    pub dry_run: bool,
    /// Commit without asking for confirmation.
    pub yes: bool,
    /// Never sign, whatever the settings say.
    pub unsigned: bool,
    /// Extra arguments for `git commit`.
    pub git_args: Vec<String>,
}

/// What the wizard ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Committed { message: String, output: String },
    Printed { message: String },
}

/// Changes requested through `kcommit scope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeAction {
    Show,
    Set(String),
    Reset,
}

/// The (project, branch) the wizard works on and its scope, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeReport {
    pub project: String,
    pub branch: String,
    pub scope: Option<String>,
}

/// Builds a conventional commit header.
#[must_use]
pub fn format_commit_message(commit_type: &str, scope: &str, description: &str) -> String {
    format!("{commit_type}({scope}): {description}")
}

pub struct Runner<'a, G: GitOperations, P: Prompter> {
    git: &'a G,
    prompter: &'a P,
    history_file: HistoryFile,
    settings: Settings,
}

impl<'a, G: GitOperations, P: Prompter> Runner<'a, G, P> {
    pub fn new(git: &'a G, prompter: &'a P, history_file: HistoryFile, settings: Settings) -> Self {
        Runner {
            git,
            prompter,
            history_file,
            settings,
        }
    }

    /// Runs the whole wizard.
    ///
    /// The history is saved once the user has confirmed what to do with the
    /// message, before `git commit` runs, so a failing hook does not lose the
    /// scope that was just chosen.
    ///
    /// # Errors
    /// * `GitError::RepositoryNotFound` outside a repository
    /// * If the history or `.kcommitrc` cannot be read or parsed
    /// * `KcommitError::UserCancelled` / `InvalidInput` on dismissed or empty answers
    /// * If `git commit` fails
    pub fn run(&self, options: &WizardOptions, now: DateTime<Utc>) -> Result<WizardOutcome> {
        self.ensure_repository()?;
        self.history_file.setup()?;

        let top_level = self.git.top_level_path()?;
        let rules = CommitRules::load(&top_level)?;
        let project = project_name(&top_level)?;
        let branch = self.git.current_branch()?;

        let _span = tracing::debug_span!("wizard", %project, %branch).entered();

        let mut history = self.history_file.load()?;
        if !history.has_branch(&project, &branch) {
            history.add_branch(&project, &branch, now)?;
        }

        let stored_scope = history.find_branch(&project, &branch)?.scope.clone();
        let scope = match &options.scope {
            Some(scope) => validate_input(scope, "scope")?,
            None if stored_scope.is_empty() => self.ask_scope(&branch)?,
            None => stored_scope,
        };

        // Refreshes the timestamp even when the scope did not change.
        history.set_branch(&project, &branch, &scope, now);

        let commit_type = self.commit_type(options, &rules)?;
        let description = match &options.message {
            Some(message) => validate_input(message, "commit message")?,
            None => validate_input(
                &self.prompter.text("Write the commit message", "")?,
                "commit message",
            )?,
        };

        let message = format_commit_message(&commit_type, &scope, &description);
        let should_commit = self.should_commit(options, &message)?;

        self.save(&mut history, now)?;

        if should_commit {
            let sign = self.settings.sign_commits && !options.unsigned;
            let output = self.git.commit(&message, &options.git_args, sign)?;

            Ok(WizardOutcome::Committed { message, output })
        } else {
            Ok(WizardOutcome::Printed { message })
        }
    }

    /// Shows, sets or forgets the scope of the current branch.
    ///
    /// # Errors
    /// * `GitError::RepositoryNotFound` outside a repository
    /// * If the history cannot be read or written
    /// * `KcommitError::InvalidInput` when setting an empty scope
    pub fn scope(&self, action: &ScopeAction, now: DateTime<Utc>) -> Result<ScopeReport> {
        self.ensure_repository()?;

        let project = project_name(&self.git.top_level_path()?)?;
        let branch = self.git.current_branch()?;
        let mut history = self.history_file.load()?;

        let scope = match action {
            ScopeAction::Show => history
                .find_branch(&project, &branch)
                .ok()
                .map(|entry| entry.scope.clone())
                .filter(|scope| !scope.is_empty()),
            ScopeAction::Set(scope) => {
                let scope = validate_input(scope, "scope")?;
                history.set_branch(&project, &branch, &scope, now);
                self.save(&mut history, now)?;
                Some(scope)
            }
            ScopeAction::Reset => {
                history.remove_branch(&project, &branch);
                self.save(&mut history, now)?;
                None
            }
        };

        Ok(ScopeReport {
            project,
            branch,
            scope,
        })
    }

    fn ensure_repository(&self) -> Result<()> {
        if self.git.is_repository() {
            Ok(())
        } else {
            Err(GitError::RepositoryNotFound.into())
        }
    }

    fn ask_scope(&self, branch: &str) -> Result<String> {
        let choices = [
            Choice::new(SCOPE_FROM_BRANCH, "use branch name as scope"),
            Choice::new(SCOPE_CUSTOM, "write a custom string to be the scope"),
        ];

        let answer = self
            .prompter
            .select("This branch does not have scope defined yet.", &choices)?;

        if answer == SCOPE_FROM_BRANCH {
            Ok(branch.to_string())
        } else {
            let scope = self.prompter.text("Write a name for the scope", "")?;
            validate_input(&scope, "scope")
        }
    }

    fn commit_type(&self, options: &WizardOptions, rules: &CommitRules) -> Result<String> {
        match &options.commit_type {
            Some(kind) if rules.contains(kind) => Ok(kind.clone()),
            Some(kind) => Err(KcommitError::InvalidInput(format!(
                "unknown commit type '{kind}'"
            ))),
            None => {
                let answer = self
                    .prompter
                    .select("Please choose a commit type", &rules.choices())?;
                validate_input(&answer, "commit type")
            }
        }
    }

    fn should_commit(&self, options: &WizardOptions, message: &str) -> Result<bool> {
        if options.dry_run {
            return Ok(false);
        }

        if options.yes {
            return Ok(true);
        }

        let choices = [
            Choice::new(
                ACTION_COMMIT,
                format!("kcommit will call git commit with: {message}"),
            ),
            Choice::new(
                ACTION_PRINT,
                "kcommit will not call git commit, just print the resulting commit message",
            ),
        ];

        let answer = self
            .prompter
            .select("What should kcommit do with this message?", &choices)?;

        Ok(answer == ACTION_COMMIT)
    }

    fn save(&self, history: &mut HistoryStore, now: DateTime<Utc>) -> Result<()> {
        history.clean_old_branches(now, self.settings.retention_months);
        self.history_file.save(history)
    }
}
