use std::fs;
use std::path::Path;

use super::failure::{FailureSink, FailureStage};

/// True if `path` currently has no entries at all.
///
/// Any error while listing is recorded and reported as "not empty", so an
/// unreadable directory is never handed to the deletion step.
pub fn is_empty(path: &Path, sink: &mut FailureSink) -> bool {
    let mut entries = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) => {
            sink.record(path, FailureStage::EmptinessCheck, e);
            return false;
        }
    };

    match entries.next() {
        None => true,
        Some(Ok(_)) => false,
        Some(Err(e)) => {
            sink.record(path, FailureStage::EmptinessCheck, e);
            false
        }
    }
}
