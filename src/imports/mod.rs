//! Go import sorting
//!
//! This module provides:
//! - A scanner for the import section of a Go source file
//! - Classification into standard library, third-party and local groups
//! - The sorter that normalizes, regroups and emits a file

mod classify;
mod normalize;
mod parser;

pub use classify::{classify, group, render, Bucket};
pub use normalize::{Goimports, ImportNormalizer, Passthrough};
pub use parser::{parse_imports, ImportSection, ImportSpec};

use crate::error::{AppError, IoError, ManifestError, SourceError};
use crate::manifest::{parse_manifest, ChangeWriter, WriteOutcome, MANIFEST_FILENAME};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// What happened to one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file imports "C" and was left alone
    SkippedCgo,
    /// The file was processed
    Processed(WriteOutcome),
}

/// Module path used as the local import prefix.
///
/// An explicit value wins; otherwise the `module` directive of `<root>/go.mod`.
pub fn local_prefix(root: &Path, explicit: Option<&str>) -> Result<String, AppError> {
    if let Some(prefix) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(prefix.to_string());
    }

    let manifest = root.join(MANIFEST_FILENAME);
    let file = parse_manifest(&manifest)?;
    file.module_path()
        .map(str::to_string)
        .ok_or_else(|| ManifestError::MissingModule { path: manifest }.into())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Returns true if `path` names a Go source file
pub fn is_go_file(path: &Path) -> bool {
    path.extension().map(|e| e == "go").unwrap_or(false)
        && !path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true)
}

/// Every non-hidden `.go` file below `root`, sorted
pub fn find_go_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_hidden(e)) {
        let entry = entry.map_err(|e| IoError::WalkError {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_go_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Sorts the imports of Go source files
pub struct ImportSorter<'a> {
    normalizer: &'a dyn ImportNormalizer,
    local_prefix: String,
    writer: ChangeWriter,
}

impl<'a> ImportSorter<'a> {
    /// Create a new ImportSorter
    pub fn new(
        normalizer: &'a dyn ImportNormalizer,
        local_prefix: impl Into<String>,
        writer: ChangeWriter,
    ) -> Self {
        Self {
            normalizer,
            local_prefix: local_prefix.into(),
            writer,
        }
    }

    /// Rewrite `src`; returns None for cgo files
    pub fn sort_source(&self, path: &Path, src: &[u8]) -> Result<Option<Vec<u8>>, SourceError> {
        let normalized = self.normalizer.normalize(path, src)?;
        let text = std::str::from_utf8(&normalized)
            .map_err(|e| SourceError::parse_error(path, 1, format!("not UTF-8: {}", e)))?;

        let section = parse_imports(path, text)?;
        if section.has_cgo() {
            return Ok(None);
        }
        let span = match section.span.clone() {
            Some(span) => span,
            None => return Ok(Some(normalized)),
        };

        let mut out = String::with_capacity(text.len());
        if section.specs.is_empty() && section.dangling.is_empty() {
            // An empty declaration is dropped together with the blank lines after it
            let rest = text[span.end..].trim_start();
            if rest.is_empty() {
                out.push_str(text[..span.start].trim_end());
                out.push('\n');
            } else {
                out.push_str(&text[..span.start]);
                out.push_str(rest);
            }
            return Ok(Some(out.into_bytes()));
        }

        let block = render(section.specs, &section.dangling, Some(self.local_prefix.as_str()));
        out.push_str(&text[..span.start]);
        out.push_str(&block);
        out.push_str(&text[span.end..]);
        Ok(Some(out.into_bytes()))
    }

    /// Sort one file and emit the result if it changed
    pub fn process_file(&self, path: &Path, out: &mut dyn Write) -> Result<FileOutcome, SourceError> {
        let src = fs::read(path).map_err(|source| SourceError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let updated = match self.sort_source(path, &src)? {
            Some(updated) => updated,
            None => {
                debug!("skipping cgo file {}", path.display());
                return Ok(FileOutcome::SkippedCgo);
            }
        };

        let outcome = self
            .writer
            .emit(path, &src, &updated, out)
            .map_err(|source| SourceError::WriteError {
                path: path.to_path_buf(),
                source,
            })?;
        if outcome != WriteOutcome::Unchanged {
            info!("sorted imports in {}", path.display());
        }
        Ok(FileOutcome::Processed(outcome))
    }
}
