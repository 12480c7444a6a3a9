//! Children-before-parents directory traversal.
//!
//! The walk uses two explicit stacks instead of call-stack recursion so very
//! deep trees cannot overflow. Every directory is expanded before any path is
//! handed out; the ordering stack is then drained last-in first-out, which
//! puts every directory after all of its descendants.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use super::cancel::{CancellationToken, Cancelled};
use super::exclusion::ExclusionEvaluator;
use super::failure::{FailureSink, FailureStage};
use super::options::CleanOptions;

/// Everything one traversal needs.
#[derive(Debug, Clone)]
pub struct TraversalContext {
    /// Normalized scan root.
    pub root: PathBuf,
    pub options: CleanOptions,
    pub cancel: CancellationToken,
}

/// A directory waiting to be expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFrame {
    pub path: PathBuf,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Expanding,
    Draining,
    Done,
}

/// Single-pass sequence of directories, deepest first.
///
/// Yields `Err(Cancelled)` once if cancellation is observed while expanding,
/// then ends. Failures met on the way are kept until
/// [`drain_failures`](Self::drain_failures) collects them.
pub struct Traversal {
    context: TraversalContext,
    exclusions: ExclusionEvaluator,
    pending: Vec<DirectoryFrame>,
    ordering: Vec<PathBuf>,
    failures: FailureSink,
    /// `(dev, ino)` of every directory queued while following symlinks.
    visited: HashSet<(u64, u64)>,
    state: State,
}

/// Start a traversal of `context.root`.
///
/// Nothing touches the disk until the first call to `next`.
pub fn enumerate(context: TraversalContext) -> Traversal {
    let mut failures = FailureSink::new();
    let exclusions = ExclusionEvaluator::new(&context.root, &context.options, &mut failures);

    let mut pending = Vec::new();
    if exclusions.should_exclude(&context.root) {
        tracing::debug!(path = %context.root.display(), "Root is excluded, nothing to visit");
    } else {
        pending.push(DirectoryFrame {
            path: context.root.clone(),
            depth: 0,
        });
    }

    Traversal {
        context,
        exclusions,
        pending,
        ordering: Vec::new(),
        failures,
        visited: HashSet::new(),
        state: State::Expanding,
    }
}

impl Traversal {
    /// Take the failures recorded since the last call.
    pub fn drain_failures(&mut self) -> FailureSink {
        std::mem::take(&mut self.failures)
    }

    fn expand(&mut self) -> Result<(), Cancelled> {
        loop {
            self.context.cancel.check()?;
            let Some(frame) = self.pending.pop() else {
                return Ok(());
            };

            self.ordering.push(frame.path.clone());

            if self.context.options.depth_exhausted(frame.depth) {
                tracing::trace!(path = %frame.path.display(), depth = frame.depth, "Depth limit reached");
                continue;
            }

            self.context.cancel.check()?;
            self.push_children(&frame);
            self.context.cancel.check()?;
        }
    }

    fn push_children(&mut self, frame: &DirectoryFrame) {
        let read_dir = match fs::read_dir(&frame.path) {
            Ok(rd) => rd,
            Err(e) => {
                self.failures.record(&frame.path, FailureStage::Enumerate, e);
                return;
            }
        };

        let skip_reparse = self.context.options.skip_reparse_points;
        let parent_device = if skip_reparse {
            device_id(&frame.path)
        } else {
            None
        };
        if !skip_reparse && frame.depth == 0 {
            if let Ok(meta) = fs::metadata(&frame.path) {
                self.visited.insert((meta.dev(), meta.ino()));
            }
        }

        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    self.failures.record(&frame.path, FailureStage::Enumerate, e);
                    continue;
                }
            };
            // The parent is already normalized, so joining a plain name keeps
            // the child normalized without resolving symlinks.
            let child = entry.path();

            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(e) => {
                    let stage = if skip_reparse {
                        FailureStage::ReparseCheck
                    } else {
                        FailureStage::Enumerate
                    };
                    self.failures.record(&child, stage, e);
                    continue;
                }
            };

            let link_target = if file_type.is_symlink() {
                if skip_reparse {
                    tracing::debug!(path = %child.display(), "Skipping symlink");
                    continue;
                }
                match fs::metadata(&child) {
                    Ok(meta) => Some(meta),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        tracing::debug!(path = %child.display(), "Skipping dangling symlink");
                        continue;
                    }
                    Err(e) => {
                        self.failures.record(&child, FailureStage::Enumerate, e);
                        continue;
                    }
                }
            } else {
                None
            };
            let is_dir = match &link_target {
                Some(meta) => meta.is_dir(),
                None => file_type.is_dir(),
            };
            if !is_dir {
                continue;
            }

            if self.exclusions.should_exclude(&child) {
                tracing::debug!(path = %child.display(), "Excluded");
                continue;
            }

            if skip_reparse {
                match is_reparse_point(&child, parent_device) {
                    Ok(false) => {}
                    Ok(true) => {
                        tracing::debug!(path = %child.display(), "Skipping reparse point");
                        continue;
                    }
                    Err(e) => {
                        self.failures.record(&child, FailureStage::ReparseCheck, e);
                        continue;
                    }
                }
            } else if !self.first_visit(&child, link_target.as_ref()) {
                tracing::debug!(path = %child.display(), "Already visited through a symlink");
                continue;
            }

            self.pending.push(DirectoryFrame {
                path: child,
                depth: frame.depth + 1,
            });
        }
    }

    /// Remember the directory behind `path`. False for a symlink whose
    /// target was already queued, which is what stops link cycles.
    fn first_visit(&mut self, path: &Path, link_target: Option<&fs::Metadata>) -> bool {
        let identity = match link_target {
            Some(meta) => (meta.dev(), meta.ino()),
            None => match fs::metadata(path) {
                Ok(meta) => (meta.dev(), meta.ino()),
                Err(_) => return true,
            },
        };
        self.visited.insert(identity) || link_target.is_none()
    }
}

impl Iterator for Traversal {
    type Item = Result<PathBuf, Cancelled>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => return None,
            State::Expanding => {
                if let Err(cancelled) = self.expand() {
                    self.state = State::Done;
                    return Some(Err(cancelled));
                }
                self.state = State::Draining;
            }
            State::Draining => {}
        }

        match self.ordering.pop() {
            Some(path) => Some(Ok(path)),
            None => {
                self.state = State::Done;
                None
            }
        }
    }
}

fn device_id(path: &Path) -> Option<u64> {
    fs::symlink_metadata(path).ok().map(|m| m.dev())
}

/// Symlinks and mount points count as reparse points.
fn is_reparse_point(path: &Path, parent_device: Option<u64>) -> io::Result<bool> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Ok(true);
    }
    Ok(parent_device.is_some_and(|dev| dev != meta.dev()))
}
