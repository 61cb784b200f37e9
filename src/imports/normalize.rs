//! Source normalization before import sorting
//!
//! `goimports` adds missing imports, drops unused ones and formats the file.
//! When it is not installed the source is passed through unchanged.

use crate::error::SourceError;
use std::cell::Cell;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Trait for normalizing a Go source file
pub trait ImportNormalizer {
    /// Return the normalized form of `src`, which was read from `path`
    fn normalize(&self, path: &Path, src: &[u8]) -> Result<Vec<u8>, SourceError>;
}

/// Normalizer that returns its input
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl ImportNormalizer for Passthrough {
    fn normalize(&self, _path: &Path, src: &[u8]) -> Result<Vec<u8>, SourceError> {
        Ok(src.to_vec())
    }
}

/// Normalizer running the `goimports` binary
#[derive(Debug)]
pub struct Goimports {
    program: String,
    missing: Cell<bool>,
}

impl Goimports {
    /// Use `goimports` from PATH
    pub fn new() -> Self {
        Self::with_program("goimports")
    }

    /// Use a specific executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            missing: Cell::new(false),
        }
    }
}

impl Default for Goimports {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportNormalizer for Goimports {
    fn normalize(&self, path: &Path, src: &[u8]) -> Result<Vec<u8>, SourceError> {
        if self.missing.get() {
            return Ok(src.to_vec());
        }

        let mut cmd = Command::new(&self.program);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.arg("-srcdir").arg(dir);
        }
        debug!("running {} on {}", self.program, path.display());

        let child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} not found, imports are sorted without it", self.program);
                self.missing.set(true);
                return Ok(src.to_vec());
            }
            Err(e) => {
                return Err(SourceError::NormalizeError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let normalize_error = |message: String| SourceError::NormalizeError {
            path: path.to_path_buf(),
            message,
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(src)
                .map_err(|e| normalize_error(e.to_string()))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| normalize_error(e.to_string()))?;

        if !output.status.success() {
            return Err(normalize_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let src = b"package main\n";
        assert_eq!(Passthrough.normalize(Path::new("a.go"), src).unwrap(), src);
    }

    #[test]
    fn test_missing_program_passes_through() {
        let normalizer = Goimports::with_program("gomodtools-no-such-goimports");
        let src = b"package main\n";

        assert_eq!(normalizer.normalize(Path::new("a.go"), src).unwrap(), src);
        assert!(normalizer.missing.get());
        assert_eq!(normalizer.normalize(Path::new("b.go"), src).unwrap(), src);
    }
}
