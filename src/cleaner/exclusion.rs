//! Exclusion rules for directories that must never be visited.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

use super::failure::{FailureSink, FailureStage};
use super::options::CleanOptions;
use super::path::{lexical_absolute, normalize};

/// Name patterns compare case-insensitively where the filesystem usually does.
const CASE_INSENSITIVE: bool = cfg!(target_os = "macos");

/// Decides whether a directory is skipped together with its subtree.
///
/// Name patterns use glob syntax against single path segments below the
/// root: `*` and `?` never cross a separator, `[..]` classes and `{a,b}`
/// alternation are supported.
///
/// Excluded full paths are kept both as written and resolved, so a subtree
/// reached through a followed symlink is excluded under either spelling.
#[derive(Debug)]
pub struct ExclusionEvaluator {
    root: PathBuf,
    names: GlobSet,
    full_paths: Vec<PathBuf>,
    resolve_candidates: bool,
}

impl ExclusionEvaluator {
    /// Compile the exclusion rules of `options`.
    ///
    /// Patterns that fail to compile are recorded in `sink` and never match.
    pub fn new(root: &Path, options: &CleanOptions, sink: &mut FailureSink) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &options.excluded_name_patterns {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                continue;
            }
            match GlobBuilder::new(pattern)
                .literal_separator(true)
                .case_insensitive(CASE_INSENSITIVE)
                .build()
            {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => sink.record(
                    root,
                    FailureStage::Pattern,
                    format!("invalid exclusion pattern '{}': {}", pattern, e),
                ),
            }
        }

        let names = match builder.build() {
            Ok(set) => set,
            Err(e) => {
                sink.record(root, FailureStage::Pattern, e);
                GlobSet::empty()
            }
        };

        let mut full_paths = Vec::with_capacity(options.excluded_full_paths.len() * 2);
        for path in &options.excluded_full_paths {
            match (lexical_absolute(path), normalize(path)) {
                (Ok(lexical), Ok(resolved)) => {
                    if lexical != resolved {
                        full_paths.push(resolved);
                    }
                    full_paths.push(lexical);
                }
                (Err(e), _) | (_, Err(e)) => sink.record(path, FailureStage::Pattern, e),
            }
        }

        Self {
            root: root.to_path_buf(),
            names,
            full_paths,
            resolve_candidates: !options.skip_reparse_points,
        }
    }

    fn under_excluded_path(&self, path: &Path) -> bool {
        self.full_paths
            .iter()
            .any(|excluded| path.starts_with(excluded))
    }

    /// True if `path` or one of its ancestors below the root is excluded.
    pub fn should_exclude(&self, path: &Path) -> bool {
        if self.under_excluded_path(path) {
            return true;
        }

        // Through a followed symlink the in-tree path and the real one differ.
        if self.resolve_candidates && !self.full_paths.is_empty() {
            if let Ok(resolved) = path.canonicalize() {
                if self.under_excluded_path(&resolved) {
                    return true;
                }
            }
        }

        if self.names.is_empty() {
            return false;
        }

        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        relative.components().any(|component| match component {
            Component::Normal(segment) => self.names.is_match(Path::new(segment)),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(options: &CleanOptions) -> (ExclusionEvaluator, FailureSink) {
        let mut sink = FailureSink::new();
        let eval = ExclusionEvaluator::new(Path::new("/data"), options, &mut sink);
        (eval, sink)
    }

    #[test]
    fn test_no_rules_excludes_nothing() {
        let (eval, sink) = evaluator(&CleanOptions::default());
        assert!(!eval.should_exclude(Path::new("/data/a/b")));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_full_path_excludes_subtree() {
        let opts = CleanOptions::new().with_excluded_paths(["/data/keep"]);
        let (eval, _) = evaluator(&opts);

        assert!(eval.should_exclude(Path::new("/data/keep")));
        assert!(eval.should_exclude(Path::new("/data/keep/inner")));
        assert!(!eval.should_exclude(Path::new("/data/keeper")));
        assert!(!eval.should_exclude(Path::new("/data/other")));
    }

    #[test]
    fn test_name_pattern_matches_segment() {
        let opts = CleanOptions::new().with_excluded_names(["node_modules", "*.cache"]);
        let (eval, _) = evaluator(&opts);

        assert!(eval.should_exclude(Path::new("/data/web/node_modules")));
        assert!(eval.should_exclude(Path::new("/data/build.cache")));
        assert!(!eval.should_exclude(Path::new("/data/web/src")));
    }

    #[test]
    fn test_name_pattern_matches_ancestor_segment() {
        let opts = CleanOptions::new().with_excluded_names([".git"]);
        let (eval, _) = evaluator(&opts);

        assert!(eval.should_exclude(Path::new("/data/repo/.git/objects/ab")));
    }

    #[test]
    fn test_star_does_not_cross_segments() {
        let opts = CleanOptions::new().with_excluded_names(["a*b"]);
        let (eval, _) = evaluator(&opts);

        assert!(eval.should_exclude(Path::new("/data/axxb")));
        assert!(!eval.should_exclude(Path::new("/data/a/b")));
    }

    #[test]
    fn test_segments_above_root_are_ignored() {
        let opts = CleanOptions::new().with_excluded_names(["data"]);
        let (eval, _) = evaluator(&opts);

        assert!(!eval.should_exclude(Path::new("/data/child")));
        assert!(eval.should_exclude(Path::new("/data/child/data")));
    }

    #[test]
    fn test_root_is_not_matched_by_name() {
        let opts = CleanOptions::new().with_excluded_names(["*"]);
        let (eval, _) = evaluator(&opts);

        assert!(!eval.should_exclude(Path::new("/data")));
        assert!(eval.should_exclude(Path::new("/data/anything")));
    }

    #[test]
    fn test_malformed_pattern_is_recorded_and_never_matches() {
        let opts = CleanOptions::new().with_excluded_names(["[unclosed", "tmp"]);
        let (eval, sink) = evaluator(&opts);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.failures()[0].stage, FailureStage::Pattern);
        assert!(sink.failures()[0].error.contains("[unclosed"));
        assert!(!eval.should_exclude(Path::new("/data/[unclosed")));
        assert!(eval.should_exclude(Path::new("/data/tmp")));
    }

    #[test]
    fn test_blank_patterns_are_ignored() {
        let opts = CleanOptions::new().with_excluded_names(["", "   "]);
        let (eval, sink) = evaluator(&opts);

        assert!(sink.is_empty());
        assert!(!eval.should_exclude(Path::new("/data/x")));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_patterns_are_case_sensitive_on_linux() {
        let opts = CleanOptions::new().with_excluded_names(["Cache"]);
        let (eval, _) = evaluator(&opts);

        assert!(eval.should_exclude(Path::new("/data/Cache")));
        assert!(!eval.should_exclude(Path::new("/data/cache")));
    }

    fn symlinked_tree() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::TempDir::new().unwrap();
        let base = tmp.path().canonicalize().unwrap();
        std::fs::create_dir_all(base.join("real/keep")).unwrap();
        std::fs::create_dir(base.join("scan")).unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("scan/alias")).unwrap();
        (tmp, base)
    }

    #[test]
    fn test_excluded_path_through_symlink_matches_in_tree_spelling() {
        let (_tmp, base) = symlinked_tree();
        let root = base.join("scan");
        let opts = CleanOptions::new()
            .with_skip_reparse_points(false)
            .with_excluded_paths([root.join("alias/keep")]);
        let mut sink = FailureSink::new();

        let eval = ExclusionEvaluator::new(&root, &opts, &mut sink);

        assert!(sink.is_empty());
        assert!(eval.should_exclude(&root.join("alias/keep")));
        assert!(eval.should_exclude(&base.join("real/keep")));
        assert!(!eval.should_exclude(&root.join("alias")));
    }

    #[test]
    fn test_excluded_real_path_matches_candidate_reached_through_symlink() {
        let (_tmp, base) = symlinked_tree();
        let root = base.join("scan");
        let opts = CleanOptions::new()
            .with_skip_reparse_points(false)
            .with_excluded_paths([base.join("real/keep")]);
        let mut sink = FailureSink::new();

        let eval = ExclusionEvaluator::new(&root, &opts, &mut sink);

        assert!(eval.should_exclude(&root.join("alias/keep")));
    }
}
