use serde::Serialize;
use std::path::PathBuf;

use super::failure::CleanFailure;

/// Outcome of a completed clean pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanResult {
    /// Directories found empty, in the order they were checked.
    pub empty_directories: Vec<PathBuf>,
    /// Directories actually removed; always a subset of `empty_directories`.
    pub deleted_directories: Vec<PathBuf>,
    /// Non-fatal failures met along the way.
    pub failures: Vec<CleanFailure>,
}

impl CleanResult {
    pub fn deleted_count(&self) -> usize {
        self.deleted_directories.len()
    }

    pub fn empty_found_count(&self) -> usize {
        self.empty_directories.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Render at most `limit` failures, followed by an "...and N more" line
    /// when some were left out.
    pub fn failure_summary(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self
            .failures
            .iter()
            .take(limit)
            .map(ToString::to_string)
            .collect();

        let hidden = self.failures.len().saturating_sub(limit);
        if hidden > 0 {
            lines.push(format!("...and {} more", hidden));
        }
        lines
    }
}
