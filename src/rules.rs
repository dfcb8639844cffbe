//! Commit Type Rules
//!
//! The list of commit types offered by the wizard. A project can replace the
//! built-in list with a `.kcommitrc` JSON file at its root:
//!
//! ```json
//! { "commitTypes": [ { "type": "feat", "description": "A new feature" } ] }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{Result, RulesError},
    history::exists,
    prompt::Choice,
};

/// Name of the per-project rules file.
pub const KCOMMITRC_FILE_NAME: &str = ".kcommitrc";

const DEFAULT_COMMIT_TYPES: [(&str, &str); 11] = [
    ("feat", "Adds a new feature to the project."),
    ("fix", "Fixes a bug in the code."),
    (
        "chore",
        "Auxiliary tasks, such as dependency updates or configuration changes.",
    ),
    (
        "style",
        "Changes that do not affect functionality (e.g., formatting, whitespace).",
    ),
    (
        "refactor",
        "Refactors code without changing existing functionality.",
    ),
    ("test", "Adds or updates automated tests."),
    (
        "build",
        "Changes related to the build system or external dependencies.",
    ),
    ("revert", "Reverts a previous commit."),
    ("perf", "Performance improvements in the code."),
    ("ci", "Changes to the continuous integration configuration."),
    (
        "docs",
        "Updates documentation only, without changing the code.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitType {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRules {
    #[serde(rename = "commitTypes")]
    pub commit_types: Vec<CommitType>,
}

impl Default for CommitRules {
    fn default() -> Self {
        let commit_types = DEFAULT_COMMIT_TYPES
            .iter()
            .map(|(kind, description)| CommitType {
                kind: (*kind).to_string(),
                description: (*description).to_string(),
            })
            .collect();

        CommitRules { commit_types }
    }
}

impl CommitRules {
    /// Loads the rules of the project rooted at `project_root`.
    ///
    /// Falls back to the built-in rules when there is no `.kcommitrc`.
    ///
    /// # Errors
    /// * If `.kcommitrc` exists but cannot be read or parsed
    /// * If it declares no commit type
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(KCOMMITRC_FILE_NAME);

        if !exists(&path)? {
            tracing::debug!("no {KCOMMITRC_FILE_NAME} found, using default rules");
            return Ok(Self::default());
        }

        let origin = path.display().to_string();
        let content = fs::read_to_string(&path).map_err(|source| RulesError::Read {
            path: origin.clone(),
            source,
        })?;

        let rules = Self::parse(&content, &origin)?;
        tracing::debug!(
            count = rules.commit_types.len(),
            path = %origin,
            "loaded custom commit rules"
        );

        Ok(rules)
    }

    /// Parses the content of a rules file; `origin` is only used in errors.
    ///
    /// # Errors
    /// * If the JSON is malformed or declares no commit type
    pub fn parse(content: &str, origin: &str) -> Result<Self> {
        let rules: CommitRules =
            serde_json::from_str(content).map_err(|source| RulesError::Parse {
                path: origin.to_string(),
                source,
            })?;

        if rules.commit_types.is_empty() {
            return Err(RulesError::NoCommitTypes {
                path: origin.to_string(),
            }
            .into());
        }

        Ok(rules)
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.commit_types.iter().any(|t| t.kind == kind)
    }

    /// The commit types as prompt choices.
    #[must_use]
    pub fn choices(&self) -> Vec<Choice> {
        self.commit_types
            .iter()
            .map(|t| Choice::new(&t.kind, &t.description))
            .collect()
    }
}
