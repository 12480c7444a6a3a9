//! Path normalization for stable comparisons.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalize a directory path to an absolute form.
///
/// Existing paths are canonicalized so that a root given through a symlink
/// and the excluded paths configured for it compare equal. Paths that do not
/// exist are made absolute against the current directory and cleaned
/// lexically (`.` dropped, `..` folded).
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    match path.canonicalize() {
        Ok(canonical) => Ok(canonical),
        Err(_) => lexical_absolute(path),
    }
}

/// Absolute form of `path` without resolving symlinks.
pub fn lexical_absolute(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    Ok(cleaned)
}
