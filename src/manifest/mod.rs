//! go.mod detection, parsing and writing
//!
//! This module provides functionality to:
//! - Find go.mod files below a directory
//! - Parse and rewrite go.mod files without disturbing their layout
//! - Write results back in place or to a stream, only when they changed

mod detector;
mod go_mod;
mod writer;

pub use detector::{detect_manifests, resolve_manifest_path, MANIFEST_FILENAME};
pub use go_mod::{GoMod, Requirement};
pub use writer::{write_preserving_permissions, ChangeWriter, WriteOutcome};

use crate::error::ManifestError;
use std::path::Path;

/// Read a manifest file as raw bytes
pub fn read_manifest(path: &Path) -> Result<Vec<u8>, ManifestError> {
    std::fs::read(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Read and parse a manifest file
pub fn parse_manifest(path: &Path) -> Result<GoMod, ManifestError> {
    let data = read_manifest(path)?;
    let content = String::from_utf8_lossy(&data);
    GoMod::parse(path, &content)
}
