//! Per-directory failures collected during a clean pass.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Step of the pass that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// An exclusion pattern could not be compiled.
    Pattern,
    /// Listing a directory's children failed.
    Enumerate,
    /// Reading a child's attributes for the reparse-point check failed.
    ReparseCheck,
    /// Listing a candidate to decide emptiness failed.
    EmptinessCheck,
    /// Removing or trashing a directory failed.
    Delete,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureStage::Pattern => "pattern",
            FailureStage::Enumerate => "enumerate",
            FailureStage::ReparseCheck => "reparse check",
            FailureStage::EmptinessCheck => "emptiness check",
            FailureStage::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// A non-fatal failure tied to one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub error: String,
}

impl fmt::Display for CleanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path.display(), self.stage, self.error)
    }
}

/// Append-only collector for [`CleanFailure`]s.
///
/// One sink lives for exactly one clean call.
#[derive(Debug, Default)]
pub struct FailureSink {
    failures: Vec<CleanFailure>,
}

impl FailureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure and log it.
    pub fn record(&mut self, path: &Path, stage: FailureStage, error: impl fmt::Display) {
        let failure = CleanFailure {
            path: path.to_path_buf(),
            stage,
            error: error.to_string(),
        };
        tracing::warn!(path = %failure.path.display(), %stage, error = %failure.error, "Recorded failure");
        self.failures.push(failure);
    }

    /// Move every failure of `other` to the end of this sink.
    pub fn absorb(&mut self, other: &mut FailureSink) {
        self.failures.append(&mut other.failures);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[CleanFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<CleanFailure> {
        self.failures
    }
}
