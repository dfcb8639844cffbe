//! Configuration Management Module for kcommit
//!
//! Settings are layered, later sources winning:
//! - built-in defaults
//! - `~/.config/kcommit/config.toml`
//! - `KCOMMIT_*` environment variables (e.g. `KCOMMIT_RETENTION_MONTHS=3`)
//!
//! # Configuration Structure
//!
//! ```toml
//! history_dir = "/home/me/.kcommit"
//! retention_months = 1
//! sign_commits = false
//! page_size = 16
//! ```
//!
//! The home directory used for every default path can be overridden with
//! `KCOMMIT_HOME`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use ::config::{Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ConfigError, Result},
    history::{HistoryFile, exists},
};

pub const CONFIG_FOLDER_NAME: &str = "kcommit";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the home directory.
pub const HOME_ENV_VAR: &str = "KCOMMIT_HOME";

const ENV_PREFIX: &str = "KCOMMIT";

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder holding the history file, `~/.kcommit` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,

    /// Branches unused for longer than this many months are forgotten.
    pub retention_months: u32,

    /// Pass `-S` to `git commit`.
    pub sign_commits: bool,

    /// Number of rows shown by selection prompts.
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            history_dir: None,
            retention_months: 1,
            sign_commits: false,
            page_size: 16,
        }
    }
}

/// Main configuration struct that handles all config operations
pub struct Config {
    root: PathBuf,
}

impl Config {
    /// Creates a new Config instance rooted at the user's home directory
    ///
    /// # Errors
    /// * When the home directory cannot be determined
    pub fn new() -> Result<Self> {
        let root = Config::get_config_root()?;
        Ok(Config { root })
    }

    /// Creates a new Config instance with a custom root path
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Config { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the layered settings.
    ///
    /// # Errors
    /// * If the settings file or an environment variable holds invalid values
    pub fn load_settings(&self) -> Result<Settings> {
        let config_file = self.get_config_file_path();

        let settings = ::config::Config::builder()
            .add_source(File::from(config_file.as_path()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|config| config.try_deserialize::<Settings>())
            .map_err(ConfigError::from)?;

        tracing::debug!(?settings, "settings loaded");

        Ok(settings)
    }

    /// The history file selected by `settings`.
    #[must_use]
    pub fn history_file(&self, settings: &Settings) -> HistoryFile {
        match &settings.history_dir {
            Some(dir) => HistoryFile::new(dir),
            None => HistoryFile::in_home(&self.root),
        }
    }

    /// Writes the default settings to the configuration file.
    ///
    /// # Errors
    /// * If an I/O error occurs while creating the configuration file
    /// * If the file already exists
    pub fn create_config_file(&self) -> Result<PathBuf> {
        let config_folder = self.get_config_folder_path();

        if !exists(&config_folder)? {
            fs::create_dir_all(&config_folder).map_err(ConfigError::from)?;
        }

        let config_file = self.get_config_file_path();

        if exists(&config_file)? {
            return Err(ConfigError::ConfigAlreadyExists {
                path: config_file.display().to_string(),
            }
            .into());
        }

        let content = toml::to_string_pretty(&Settings::default()).map_err(ConfigError::from)?;
        fs::write(&config_file, content).map_err(ConfigError::from)?;

        Ok(config_file)
    }

    /// Returns the path to the configuration folder.
    #[must_use]
    pub fn get_config_folder_path(&self) -> PathBuf {
        self.root.join(".config").join(CONFIG_FOLDER_NAME)
    }

    /// Returns the path to the configuration file
    #[must_use]
    pub fn get_config_file_path(&self) -> PathBuf {
        self.get_config_folder_path().join(CONFIG_FILE_NAME)
    }

    /// Returns the root directory for the configuration files
    ///
    /// # Errors
    /// * If the home directory cannot be determined
    fn get_config_root() -> Result<PathBuf> {
        if let Ok(home) = env::var(HOME_ENV_VAR) {
            return Ok(PathBuf::from(home));
        }

        dirs::home_dir().ok_or_else(|| ConfigError::HomeDirNotFound.into())
    }
}
