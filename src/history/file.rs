//! History File Management
//!
//! Locates, creates, reads and atomically rewrites the history file
//! (`~/.kcommit/.kcommit_history.json` by default).

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::errors::{HistoryError, Result};

use super::store::HistoryStore;

/// Name of the folder holding the history file, relative to the home directory.
pub const HISTORY_DIR_NAME: &str = ".kcommit";

/// Name of the history file inside [`HISTORY_DIR_NAME`].
pub const HISTORY_FILE_NAME: &str = ".kcommit_history.json";

/// Handle on the history file of a given directory.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    dir: PathBuf,
}

impl HistoryFile {
    /// Creates a handle on `<dir>/.kcommit_history.json`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        HistoryFile { dir: dir.into() }
    }

    /// Handle on the default location under `home`.
    pub fn in_home(home: &Path) -> Self {
        Self::new(home.join(HISTORY_DIR_NAME))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE_NAME)
    }

    /// Creates the history folder and an empty history file when missing.
    ///
    /// # Errors
    /// * If the folder or file cannot be created
    pub fn setup(&self) -> Result<()> {
        if !exists(&self.dir)? {
            tracing::debug!(dir = %self.dir.display(), "creating history folder");
            fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        }

        let path = self.path();
        if !exists(&path)? {
            tracing::debug!(path = %path.display(), "creating empty history file");
            fs::write(&path, "").map_err(|e| io_error(&path, e))?;
        }

        Ok(())
    }

    /// Raw content of the history file.
    ///
    /// # Errors
    /// * If the file cannot be read
    pub fn read_content(&self) -> Result<String> {
        let path = self.path();
        fs::read_to_string(&path).map_err(|e| io_error(&path, e))
    }

    /// Loads the history, treating a missing file like an empty one.
    ///
    /// # Errors
    /// * If the file exists but cannot be read or parsed
    pub fn load(&self) -> Result<HistoryStore> {
        if !exists(&self.path())? {
            return Ok(HistoryStore::new());
        }

        let store = HistoryStore::from_json(&self.read_content()?)?;
        tracing::debug!(entries = store.len(), "history loaded");

        Ok(store)
    }

    /// Replaces the file content by writing to a sibling temp file first.
    ///
    /// # Errors
    /// * If the temporary file cannot be written or renamed
    pub fn write_content(&self, content: &str) -> Result<()> {
        let path = self.path();
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, content).map_err(|e| io_error(&tmp_path, e))?;
        fs::rename(&tmp_path, &path).map_err(|e| io_error(&path, e))?;

        Ok(())
    }

    /// Serializes and writes the history.
    ///
    /// # Errors
    /// * If serialization or writing fails
    pub fn save(&self, store: &HistoryStore) -> Result<()> {
        self.setup()?;
        self.write_content(&store.to_json()?)?;
        tracing::debug!(entries = store.len(), path = %self.path().display(), "history saved");

        Ok(())
    }
}

/// Checks whether `path` exists.
///
/// Unlike [`Path::exists`], failures other than "not found" (permissions, ...)
/// are reported instead of being read as absence.
///
/// # Errors
/// * If the metadata of `path` cannot be read for another reason than absence
pub fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> crate::errors::KcommitError {
    HistoryError::Io {
        path: path.display().to_string(),
        source,
    }
    .into()
}
