use std::collections::BTreeSet;
use std::path::PathBuf;

/// Options for one clean pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    /// Report empty directories without deleting anything
    pub dry_run: bool,

    /// Move directories to the trash instead of removing them
    pub send_to_trash: bool,

    /// Never descend into symlinks or mount points
    pub skip_reparse_points: bool,

    /// Allow the scan root itself to be reported and deleted
    pub delete_root_when_empty: bool,

    /// Maximum depth to descend (root = 0, None = unlimited)
    pub max_depth: Option<usize>,

    /// Glob patterns matched against each path segment below the root
    pub excluded_name_patterns: BTreeSet<String>,

    /// Absolute paths whose whole subtree is left alone
    pub excluded_full_paths: BTreeSet<PathBuf>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            send_to_trash: false,
            skip_reparse_points: true,
            delete_root_when_empty: false,
            max_depth: None,
            excluded_name_patterns: BTreeSet::new(),
            excluded_full_paths: BTreeSet::new(),
        }
    }
}

impl CleanOptions {
    /// Create a new CleanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_send_to_trash(mut self, trash: bool) -> Self {
        self.send_to_trash = trash;
        self
    }

    pub fn with_skip_reparse_points(mut self, skip: bool) -> Self {
        self.skip_reparse_points = skip;
        self
    }

    pub fn with_delete_root_when_empty(mut self, delete_root: bool) -> Self {
        self.delete_root_when_empty = delete_root;
        self
    }

    /// Set maximum recursion depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Add name patterns to exclude
    pub fn with_excluded_names<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_name_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add full paths to exclude
    pub fn with_excluded_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.excluded_full_paths
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// True when a directory at `depth` must not have its children listed.
    pub fn depth_exhausted(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }
}
