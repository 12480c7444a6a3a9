//! Executor for removing a single empty directory.

use std::fmt;
use std::fs;
use std::path::Path;

use super::cancel::{CancellationToken, Cancelled};
use super::failure::{FailureSink, FailureStage};

/// How a directory is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMode {
    /// Non-recursive `remove_dir`.
    Permanent,
    /// Move to the platform trash / recycle bin.
    Trash,
}

impl DeletionMode {
    pub fn from_trash_flag(send_to_trash: bool) -> Self {
        if send_to_trash {
            DeletionMode::Trash
        } else {
            DeletionMode::Permanent
        }
    }
}

impl fmt::Display for DeletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionMode::Permanent => f.write_str("permanent"),
            DeletionMode::Trash => f.write_str("trash"),
        }
    }
}

/// Executor for deleting directories found empty.
pub struct DeletionExecutor {
    cancel: CancellationToken,
}

impl DeletionExecutor {
    /// Create a new executor polling the given token.
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Delete one directory.
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` after recording the
    /// failure in `sink`. Only cancellation is returned as an error.
    ///
    /// Permanent deletion never recurses: if content appeared after the
    /// emptiness check, the removal fails and the content survives.
    pub fn delete(
        &self,
        path: &Path,
        mode: DeletionMode,
        sink: &mut FailureSink,
    ) -> Result<bool, Cancelled> {
        self.cancel.check()?;

        let outcome = match mode {
            DeletionMode::Permanent => fs::remove_dir(path).map_err(|e| e.to_string()),
            DeletionMode::Trash => trash::delete(path).map_err(|e| e.to_string()),
        };

        match outcome {
            Ok(()) => {
                tracing::info!(path = %path.display(), %mode, "Deleted empty directory");
                Ok(true)
            }
            Err(error) => {
                sink.record(path, FailureStage::Delete, error);
                Ok(false)
            }
        }
    }
}
