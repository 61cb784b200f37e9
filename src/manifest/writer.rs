//! Result writing shared by modup and sortimports
//!
//! This module provides:
//! - ChangeWriter, which emits rewritten content only when it differs
//! - In-place writes that keep the original permission bits

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// What happened to a rewritten file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Output was byte-identical to the input; nothing emitted
    Unchanged,
    /// Output was written back to the source file
    Written,
    /// Output was written to the output stream
    Printed,
}

/// Writer that applies the write-or-stdout policy
#[derive(Debug, Clone, Copy)]
pub struct ChangeWriter {
    /// Whether to write results back to the source file
    in_place: bool,
}

impl ChangeWriter {
    /// Create a new ChangeWriter
    pub fn new(in_place: bool) -> Self {
        Self { in_place }
    }

    /// Emit `updated` for `path` if it differs from `original`
    pub fn emit(
        &self,
        path: &Path,
        original: &[u8],
        updated: &[u8],
        out: &mut dyn Write,
    ) -> io::Result<WriteOutcome> {
        if original == updated {
            return Ok(WriteOutcome::Unchanged);
        }

        if self.in_place {
            write_preserving_permissions(path, updated)?;
            Ok(WriteOutcome::Written)
        } else {
            out.write_all(updated)?;
            Ok(WriteOutcome::Printed)
        }
    }
}

/// Overwrite `path` with `content`, restoring its permission bits afterwards
pub fn write_preserving_permissions(path: &Path, content: &[u8]) -> io::Result<()> {
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());
    fs::write(path, content)?;
    if let Some(permissions) = permissions {
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}
