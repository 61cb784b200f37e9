//! git integration for sortimports
//!
//! Lists the Go files changed in the working tree or the index.

use crate::error::CommandError;
use crate::imports::is_go_file;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Which changes to pick files from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChangeMode {
    /// Files staged in the index
    Staged,
    /// Files modified in the working tree
    Diff,
}

impl ChangeMode {
    /// Arguments passed to git
    pub fn git_args(&self) -> &'static [&'static str] {
        match self {
            ChangeMode::Staged => &["diff", "--name-only", "--cached", "--relative"],
            ChangeMode::Diff => &["diff", "--name-only", "--relative"],
        }
    }
}

/// Go files named in `git diff --name-only` output that still exist under `root`
pub fn parse_name_list(root: &Path, stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| root.join(line))
        .filter(|path| is_go_file(path) && path.is_file())
        .collect()
}

/// Changed Go files below `root`
pub fn changed_files(root: &Path, mode: ChangeMode) -> Result<Vec<PathBuf>, CommandError> {
    let args = mode.git_args();
    debug!("running git {}", args.join(" "));

    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| CommandError::spawn("git", e))?;
    if !output.status.success() {
        return Err(CommandError::failed(
            format!("git {}", args.join(" ")),
            root,
            String::from_utf8_lossy(&output.stderr).trim(),
        ));
    }

    Ok(parse_name_list(root, &String::from_utf8_lossy(&output.stdout)))
}
