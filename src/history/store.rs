//! Branch-Scope History Store
//!
//! In-memory map of `project -> branch -> scope` with the timestamp of the last
//! time each entry was used. Entries that have not been touched within the
//! retention window are evicted by [`HistoryStore::clean_old_branches`].

use std::collections::BTreeMap;

use chrono::{DateTime, Months, Utc};

use crate::errors::{HistoryError, Result};

use super::record::{BranchRecord, HistoryRecord, ProjectRecord};

/// Scope remembered for a single branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEntry {
    pub scope: String,
    pub updated_at: DateTime<Utc>,
}

/// The branch-scope history, keyed by project name then branch name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    projects: BTreeMap<String, BTreeMap<String, BranchEntry>>,
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the JSON content of the history file.
    ///
    /// Empty content is an empty history. Projects listed more than once are
    /// merged, the last record of a branch wins.
    ///
    /// # Errors
    /// * If the content is not valid history JSON
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }

        let record: HistoryRecord = serde_json::from_str(content).map_err(HistoryError::Parse)?;

        Ok(Self::from(record))
    }

    /// Serializes the history to pretty-printed JSON.
    ///
    /// # Errors
    /// * If serialization fails
    pub fn to_json(&self) -> Result<String> {
        let record = HistoryRecord::from(self);

        Ok(serde_json::to_string_pretty(&record).map_err(HistoryError::Serialize)?)
    }

    #[must_use]
    pub fn has_project(&self, project: &str) -> bool {
        self.projects.contains_key(project)
    }

    #[must_use]
    pub fn has_branch(&self, project: &str, branch: &str) -> bool {
        self.projects
            .get(project)
            .is_some_and(|branches| branches.contains_key(branch))
    }

    /// Looks up the entry of `branch` in `project`.
    ///
    /// # Errors
    /// * `HistoryError::ProjectNotFound` if the project is unknown
    /// * `HistoryError::BranchNotFound` if the project has no such branch
    pub fn find_branch(&self, project: &str, branch: &str) -> Result<&BranchEntry> {
        let branches =
            self.projects
                .get(project)
                .ok_or_else(|| HistoryError::ProjectNotFound {
                    project: project.to_string(),
                })?;

        branches.get(branch).ok_or_else(|| {
            HistoryError::BranchNotFound {
                project: project.to_string(),
                branch: branch.to_string(),
            }
            .into()
        })
    }

    /// Registers a branch with no scope yet, creating the project if needed.
    ///
    /// # Errors
    /// * `HistoryError::BranchExists` if the branch is already registered
    pub fn add_branch(&mut self, project: &str, branch: &str, now: DateTime<Utc>) -> Result<()> {
        let branches = self.projects.entry(project.to_string()).or_default();

        if branches.contains_key(branch) {
            return Err(HistoryError::BranchExists {
                project: project.to_string(),
                branch: branch.to_string(),
            }
            .into());
        }

        tracing::debug!(project, branch, "adding branch to history");

        branches.insert(
            branch.to_string(),
            BranchEntry {
                scope: String::new(),
                updated_at: now,
            },
        );

        Ok(())
    }

    /// Stores `scope` for the branch and refreshes its timestamp.
    pub fn set_branch(&mut self, project: &str, branch: &str, scope: &str, now: DateTime<Utc>) {
        tracing::debug!(project, branch, scope, "setting branch scope");

        self.projects.entry(project.to_string()).or_default().insert(
            branch.to_string(),
            BranchEntry {
                scope: scope.to_string(),
                updated_at: now,
            },
        );
    }

    /// Forgets a branch. The project goes away with its last branch.
    pub fn remove_branch(&mut self, project: &str, branch: &str) -> Option<BranchEntry> {
        let branches = self.projects.get_mut(project)?;
        let removed = branches.remove(branch);

        if branches.is_empty() {
            self.projects.remove(project);
        }

        removed
    }

    /// Evicts every branch last updated more than `retention_months` months
    /// before `now`, then drops projects left without branches.
    ///
    /// An entry stamped exactly at the cutoff is kept.
    ///
    /// # Returns
    /// The `(project, branch)` pairs that were evicted.
    pub fn clean_old_branches(
        &mut self,
        now: DateTime<Utc>,
        retention_months: u32,
    ) -> Vec<(String, String)> {
        let cutoff = now
            .checked_sub_months(Months::new(retention_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut evicted = Vec::new();

        self.projects.retain(|project, branches| {
            branches.retain(|branch, entry| {
                let keep = entry.updated_at >= cutoff;
                if !keep {
                    evicted.push((project.clone(), branch.clone()));
                }
                keep
            });

            !branches.is_empty()
        });

        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), %cutoff, "evicted stale branches");
        }

        evicted
    }

    /// Iterates over `(project, branch, entry)` in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &BranchEntry)> {
        self.projects.iter().flat_map(|(project, branches)| {
            branches
                .iter()
                .map(move |(branch, entry)| (project.as_str(), branch.as_str(), entry))
        })
    }

    /// Number of branch entries across all projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<HistoryRecord> for HistoryStore {
    fn from(record: HistoryRecord) -> Self {
        let mut store = Self::new();

        // Projects without branches are not kept.
        for project in record.projects.into_iter().filter(|p| !p.branches.is_empty()) {
            let branches = store.projects.entry(project.name).or_default();

            for branch in project.branches {
                branches.insert(
                    branch.name,
                    BranchEntry {
                        scope: branch.scope,
                        updated_at: branch.updated_at,
                    },
                );
            }
        }

        store
    }
}

impl From<&HistoryStore> for HistoryRecord {
    fn from(store: &HistoryStore) -> Self {
        let projects = store
            .projects
            .iter()
            .map(|(name, branches)| ProjectRecord {
                name: name.clone(),
                branches: branches
                    .iter()
                    .map(|(branch, entry)| BranchRecord {
                        name: branch.clone(),
                        scope: entry.scope.clone(),
                        updated_at: entry.updated_at,
                    })
                    .collect(),
            })
            .collect();

        HistoryRecord { projects }
    }
}
