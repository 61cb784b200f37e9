//! Module cache layout
//!
//! Entries live at `<cache root>/<escaped path>@<escaped version>`. The
//! `cache/` directory at the root holds download metadata and is never
//! treated as an entry.

use crate::error::IoError;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Top-level directory holding download metadata
const DOWNLOAD_DIR: &str = "cache";

/// One extracted module in the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// `escaped-path@escaped-version`, relative to the cache root
    pub key: String,
    /// Absolute location of the entry
    pub path: PathBuf,
}

/// List every `name@version` directory under `cache_root`, sorted by key
pub fn scan_entries(cache_root: &Path) -> Result<Vec<CacheEntry>, IoError> {
    if !cache_root.exists() {
        return Err(IoError::directory_not_found(cache_root));
    }

    let mut entries = Vec::new();
    let mut walker = WalkDir::new(cache_root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == DOWNLOAD_DIR));

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| IoError::WalkError {
            path: cache_root.to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_dir() {
            continue;
        }
        if !entry.file_name().to_string_lossy().contains('@') {
            continue;
        }

        walker.skip_current_dir();
        if let Ok(relative) = entry.path().strip_prefix(cache_root) {
            entries.push(CacheEntry {
                key: cache_key(relative),
                path: entry.path().to_path_buf(),
            });
        }
    }

    entries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(entries)
}

/// Relative path joined with `/` whatever the platform separator
fn cache_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Delete a cache entry, making its read-only directories writable first
pub fn remove_entry(path: &Path) -> Result<(), IoError> {
    for entry in WalkDir::new(path).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_dir() {
            make_writable(entry.path());
        }
    }

    fs::remove_dir_all(path).map_err(|source| IoError::RemoveError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(unix)]
fn make_writable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(meta) = fs::metadata(path) {
        let mut perms = meta.permissions();
        perms.set_mode(perms.mode() | 0o700);
        let _ = fs::set_permissions(path, perms);
    }
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) {
    if let Ok(meta) = fs::metadata(path) {
        let mut perms = meta.permissions();
        perms.set_readonly(false);
        let _ = fs::set_permissions(path, perms);
    }
}
