//! On-disk shape of the history file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default)]
    pub branches: Vec<BranchRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRecord {
    pub name: String,
    #[serde(default)]
    pub scope: String,
    /// Missing timestamps load as the Unix epoch, so the entry is evicted on
    /// the next cleanup.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}
