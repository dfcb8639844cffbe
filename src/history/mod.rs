//! Branch-Scope History
//!
//! Remembers which scope each branch of each project uses, so the wizard only
//! asks for it once.

pub mod file;
pub mod record;
pub mod store;

pub use file::{HistoryFile, exists};
pub use store::{BranchEntry, HistoryStore};
