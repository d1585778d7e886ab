//! Path normalization.

use std::path::{Path, PathBuf};

/// Normalize a path to absolute form.
///
/// Existing paths are canonicalized (symlinks resolved). Paths that do not
/// exist yet, like an output directory before the first build, are joined
/// onto cwd instead.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}
