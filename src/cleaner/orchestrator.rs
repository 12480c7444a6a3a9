//! Orchestrator for a single empty-directory cleaning pass.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::error::{Result, SweeperError};

use super::cancel::CancellationToken;
use super::emptiness;
use super::executor::{DeletionExecutor, DeletionMode};
use super::failure::{FailureSink, FailureStage};
use super::options::CleanOptions;
use super::path::normalize;
use super::result::CleanResult;
use super::traversal::{self, TraversalContext};

/// Callbacks invoked while a pass runs. All methods default to no-ops.
pub trait CleanReporter: Send + Sync {
    /// A directory is about to be checked.
    fn on_visit(&self, _path: &Path) {}
    /// A directory was found empty.
    fn on_empty(&self, _path: &Path) {}
    /// A directory was deleted.
    fn on_deleted(&self, _path: &Path) {}
}

/// Progress tracker for a cleaning pass, readable from another thread.
#[derive(Debug, Default)]
pub struct CleanProgress {
    visited: AtomicUsize,
    empty: AtomicUsize,
    deleted: AtomicUsize,
    current: Mutex<Option<PathBuf>>,
}

impl CleanProgress {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of directories checked so far.
    pub fn visited(&self) -> usize {
        self.visited.load(Ordering::SeqCst)
    }

    /// Number of empty directories found so far.
    pub fn empty(&self) -> usize {
        self.empty.load(Ordering::SeqCst)
    }

    /// Number of directories deleted so far.
    pub fn deleted(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }

    /// Directory currently being checked.
    pub fn current(&self) -> Option<PathBuf> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }
}

impl CleanReporter for CleanProgress {
    fn on_visit(&self, path: &Path) {
        self.visited.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut current) = self.current.lock() {
            *current = Some(path.to_path_buf());
        }
    }

    fn on_empty(&self, _path: &Path) {
        self.empty.fetch_add(1, Ordering::SeqCst);
    }

    fn on_deleted(&self, _path: &Path) {
        self.deleted.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs traversal, emptiness checks and deletion for one root.
pub struct CleanOrchestrator {
    options: CleanOptions,
    cancel: CancellationToken,
    reporter: Option<Arc<dyn CleanReporter>>,
}

impl CleanOrchestrator {
    /// Create a new orchestrator.
    pub fn new(options: CleanOptions, cancel: CancellationToken) -> Self {
        Self {
            options,
            cancel,
            reporter: None,
        }
    }

    /// Attach a progress reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn CleanReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Clean `root`.
    ///
    /// Per-directory problems end up in [`CleanResult::failures`]; only an
    /// invalid or missing root and cancellation fail the whole call. On
    /// cancellation deletions already made stay made.
    pub fn run(&self, root: &Path) -> Result<CleanResult> {
        let root = validate_root(root)?;
        let options = &self.options;

        tracing::info!(
            root = %root.display(),
            dry_run = options.dry_run,
            trash = options.send_to_trash,
            max_depth = ?options.max_depth,
            "Starting clean pass"
        );

        let mut traversal = traversal::enumerate(TraversalContext {
            root: root.clone(),
            options: options.clone(),
            cancel: self.cancel.clone(),
        });
        let executor = DeletionExecutor::new(self.cancel.clone());
        let mode = DeletionMode::from_trash_flag(options.send_to_trash);

        let mut sink = FailureSink::new();
        let mut result = CleanResult::default();

        loop {
            let next = traversal.next();
            sink.absorb(&mut traversal.drain_failures());
            let Some(item) = next else {
                break;
            };
            let path = item?;

            self.cancel.check()?;
            self.report(|r| r.on_visit(&path));

            match fs::symlink_metadata(&path) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Directory vanished, skipping");
                    continue;
                }
                Err(e) => {
                    sink.record(&path, FailureStage::EmptinessCheck, e);
                    continue;
                }
            }

            if path == root && !options.delete_root_when_empty {
                continue;
            }

            if !emptiness::is_empty(&path, &mut sink) {
                continue;
            }

            tracing::debug!(path = %path.display(), "Found empty directory");
            result.empty_directories.push(path.clone());
            self.report(|r| r.on_empty(&path));

            if options.dry_run {
                continue;
            }

            if executor.delete(&path, mode, &mut sink)? {
                self.report(|r| r.on_deleted(&path));
                result.deleted_directories.push(path);
            }
        }

        result.failures = sink.into_failures();

        tracing::info!(
            empty = result.empty_found_count(),
            deleted = result.deleted_count(),
            failures = result.failures.len(),
            "Clean pass finished"
        );

        Ok(result)
    }

    fn report(&self, f: impl FnOnce(&dyn CleanReporter)) {
        if let Some(reporter) = &self.reporter {
            f(reporter.as_ref());
        }
    }
}

fn validate_root(root: &Path) -> Result<PathBuf> {
    if root.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(SweeperError::InvalidPath(
            "root path must not be empty".to_string(),
        ));
    }

    let normalized = normalize(root).map_err(|e| SweeperError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;

    let metadata = match fs::metadata(&normalized) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SweeperError::PathNotFound(normalized));
        }
        Err(e) => {
            return Err(SweeperError::Io {
                path: normalized,
                source: e,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(SweeperError::InvalidPath(format!(
            "{} is not a directory",
            normalized.display()
        )));
    }

    Ok(normalized)
}

/// Clean `root` with `options` (defaults when `None`).
pub fn clean(
    root: &Path,
    options: Option<&CleanOptions>,
    cancel: &CancellationToken,
) -> Result<CleanResult> {
    let options = options.cloned().unwrap_or_default();
    CleanOrchestrator::new(options, cancel.clone()).run(root)
}

/// Run a whole clean pass on a worker thread.
///
/// `progress` is updated as the pass runs; join the handle for the result.
pub fn clean_in_background(
    root: PathBuf,
    options: CleanOptions,
    cancel: CancellationToken,
    progress: Arc<CleanProgress>,
) -> Result<JoinHandle<Result<CleanResult>>> {
    std::thread::Builder::new()
        .name("empty-sweeper-clean".to_string())
        .spawn({
            let root = root.clone();
            move || {
                CleanOrchestrator::new(options, cancel)
                    .with_reporter(progress)
                    .run(&root)
            }
        })
        .map_err(|e| SweeperError::Io {
            path: root,
            source: e,
        })
}
