//! Go toolchain integration
//!
//! This module provides:
//! - Listing the resolved module graph of a main module (`go list -m -json all`)
//! - Reading `go env` settings such as GOPROXY and GOMODCACHE

use crate::error::CommandError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// One module reported by `go list -m -json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListedModule {
    /// Module path
    pub path: String,
    /// Module version; empty for the main module
    #[serde(default)]
    pub version: String,
    /// Whether this is the main module
    #[serde(default)]
    pub main: bool,
    /// Whether the module is only indirectly needed
    #[serde(default)]
    pub indirect: bool,
    /// Declared go version of the module
    #[serde(default)]
    pub go_version: Option<String>,
    /// Time the version was published
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// Replacement module, if any
    #[serde(default)]
    pub replace: Option<Box<ListedModule>>,
}

impl ListedModule {
    /// `path@version` key as used by the module cache
    pub fn key(&self) -> String {
        format!("{}@{}", self.path, self.version)
    }

    /// Key followed by whichever of indirect flag, go version and publish date are known
    pub fn describe(&self) -> String {
        let mut notes = Vec::new();
        if self.indirect {
            notes.push("indirect".to_string());
        }
        if let Some(go) = &self.go_version {
            notes.push(format!("go {}", go));
        }
        if let Some(time) = &self.time {
            notes.push(time.format("%Y-%m-%d").to_string());
        }

        if notes.is_empty() {
            self.key()
        } else {
            format!("{} ({})", self.key(), notes.join(", "))
        }
    }
}

/// Trait for running go toolchain commands
pub trait GoToolchain {
    /// List every module in the build list of the module rooted at `dir`, main module excluded
    fn list_modules(&self, dir: &Path) -> Result<Vec<ListedModule>, CommandError>;

    /// Value of a `go env` variable
    fn env(&self, key: &str) -> Result<String, CommandError>;
}

/// Default runner that executes the `go` binary
#[derive(Debug, Default)]
pub struct SystemGo;

impl SystemGo {
    /// Create a new system toolchain runner
    pub fn new() -> Self {
        Self
    }

    /// Run a go command and capture output
    fn run_command(&self, args: &[&str], working_dir: Option<&Path>) -> Result<Output, CommandError> {
        let mut cmd = Command::new("go");
        cmd.args(args);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }
        debug!("running go {}", args.join(" "));

        let output = cmd.output().map_err(|e| CommandError::spawn("go", e))?;
        if !output.status.success() {
            return Err(CommandError::failed(
                format!("go {}", args.join(" ")),
                working_dir.unwrap_or_else(|| Path::new(".")),
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }
        Ok(output)
    }
}

impl GoToolchain for SystemGo {
    fn list_modules(&self, dir: &Path) -> Result<Vec<ListedModule>, CommandError> {
        let output = self.run_command(&["list", "-m", "-json", "all"], Some(dir))?;
        decode_module_stream(&output.stdout)
    }

    fn env(&self, key: &str) -> Result<String, CommandError> {
        let output = self.run_command(&["env", key], None)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Decode the concatenated JSON objects printed by `go list -m -json`, dropping the main module
pub fn decode_module_stream(data: &[u8]) -> Result<Vec<ListedModule>, CommandError> {
    let mut modules = Vec::new();

    for module in serde_json::Deserializer::from_slice(data).into_iter::<ListedModule>() {
        let module = module.map_err(|e| CommandError::InvalidOutput {
            command: "go list -m -json all".to_string(),
            message: e.to_string(),
        })?;
        if module.main {
            continue;
        }
        modules.push(module);
    }

    Ok(modules)
}
