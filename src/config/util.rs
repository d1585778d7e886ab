//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/site/data/          ← cwd
/// /home/user/site/sitemapper.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

/// Walk up from `start` looking for `config_name`.
fn find_upward(start: &Path, config_name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_upward_from_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data/posts");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("sitemapper.toml"), "").unwrap();

        let found = find_upward(&nested, Path::new("sitemapper.toml")).unwrap();
        assert_eq!(found, dir.path().join("sitemapper.toml"));
    }

    #[test]
    fn test_find_upward_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sitemapper.toml")).unwrap();
        let found = find_upward(dir.path(), Path::new("sitemapper.toml"));
        // A directory named like the config is never a match
        assert!(found.is_none_or(|path| path != dir.path().join("sitemapper.toml")));
    }

    #[test]
    fn test_absolute_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file(&path).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path), Some(path));
    }
}
