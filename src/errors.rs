use thiserror::Error;

/// Main error type for the kcommit application
#[derive(Error, Debug)]
pub enum KcommitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Commit rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled by user")]
    UserCancelled,

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error while accessing config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration - please check your config.toml syntax: {0}")]
    InvalidConfig(#[from] ::config::ConfigError),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration file already exists at {path}")]
    ConfigAlreadyExists { path: String },

    #[error("Could not determine home directory - please set HOME or KCOMMIT_HOME")]
    HomeDirNotFound,
}

/// Git-related errors
#[derive(Error, Debug)]
pub enum GitError {
    #[error("IO error during git operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Not in a git repository - please run this command from within a git repository")]
    RepositoryNotFound,

    #[error("Git command failed: {command}\nOutput: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Could not determine the project name from {path}")]
    InvalidProjectPath { path: String },
}

/// Errors raised by the branch-scope history store and its backing file
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Project '{project}' not found")]
    ProjectNotFound { project: String },

    #[error("Branch '{branch}' not found in project '{project}'")]
    BranchNotFound { project: String, branch: String },

    #[error("Branch '{branch}' already exists in project '{project}'")]
    BranchExists { project: String, branch: String },

    #[error("Failed to parse history file: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("IO error while accessing history file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while reading `.kcommitrc`
#[derive(Error, Debug)]
pub enum RulesError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} - check that the format is correct: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not define any commit types")]
    NoCommitTypes { path: String },
}

/// Type alias for Result using `KcommitError`
pub type Result<T> = std::result::Result<T, KcommitError>;
