//! go.mod file detection
//!
//! Walks a directory tree and collects every go.mod file, skipping hidden
//! directories such as `.git`.

use crate::error::IoError;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File name of a Go module manifest
pub const MANIFEST_FILENAME: &str = "go.mod";

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

/// Detect all go.mod files below `dir`, sorted by path
pub fn detect_manifests(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    let mut manifests = Vec::new();

    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|e| IoError::WalkError {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_file() && entry.file_name() == MANIFEST_FILENAME {
            manifests.push(entry.into_path());
        }
    }

    manifests.sort();
    Ok(manifests)
}

/// A directory argument means the go.mod inside it
pub fn resolve_manifest_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(MANIFEST_FILENAME)
    } else {
        target.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_nested_manifests() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("go.mod"), "module a\n").unwrap();
        fs::create_dir_all(root.join("tools/gen")).unwrap();
        fs::write(root.join("tools/gen/go.mod"), "module a/tools/gen\n").unwrap();
        fs::write(root.join("tools/README.md"), "docs").unwrap();

        let manifests = detect_manifests(root).unwrap();
        assert_eq!(
            manifests,
            vec![root.join("go.mod"), root.join("tools/gen/go.mod")]
        );
    }

    #[test]
    fn test_detect_skips_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".cache/x")).unwrap();
        fs::write(root.join(".cache/x/go.mod"), "module x\n").unwrap();

        assert!(detect_manifests(root).unwrap().is_empty());
    }

    #[test]
    fn test_detect_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(detect_manifests(&temp_dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_resolve_manifest_path() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_manifest_path(temp_dir.path()),
            temp_dir.path().join("go.mod")
        );

        let file = temp_dir.path().join("custom.mod");
        assert_eq!(resolve_manifest_path(&file), file);
    }
}
