//! Empty-directory discovery and cleanup.
//!
//! This module provides:
//! - Children-before-parents traversal with exclusions and a depth limit
//! - Emptiness checks and permanent or trash deletion
//! - A single-pass orchestrator collecting non-fatal failures

mod cancel;
pub mod emptiness;
pub mod exclusion;
pub mod executor;
mod failure;
mod options;
mod orchestrator;
pub mod path;
mod result;
pub mod traversal;

pub use cancel::{CancellationToken, Cancelled};
pub use exclusion::ExclusionEvaluator;
pub use executor::{DeletionExecutor, DeletionMode};
pub use failure::{CleanFailure, FailureSink, FailureStage};
pub use options::CleanOptions;
pub use orchestrator::{clean, clean_in_background, CleanOrchestrator, CleanProgress, CleanReporter};
pub use result::CleanResult;
pub use traversal::{enumerate, DirectoryFrame, Traversal, TraversalContext};
