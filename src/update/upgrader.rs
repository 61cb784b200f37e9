//! go.mod upgrade workflow
//!
//! Reads a manifest, optionally overrides its `go` directive, resolves every
//! selected requirement against the module proxy and rewrites the versions
//! in place. Resolution failures for a single requirement are logged and the
//! requirement keeps its version.

use crate::error::{AppError, ManifestError};
use crate::manifest::{read_manifest, ChangeWriter, GoMod, WriteOutcome};
use crate::proxy::ModuleProxy;
use crate::update::{find_latest_compatible, Resolution, UpgradeOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A requirement moved to a new version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    /// Module path
    pub module: String,
    /// Version before the upgrade
    pub from: String,
    /// Version after the upgrade
    pub to: String,
}

/// Result of upgrading one manifest
#[derive(Debug, Clone)]
pub struct UpgradeReport {
    /// Manifest path
    pub path: PathBuf,
    /// Input bytes
    pub original: Vec<u8>,
    /// Output bytes
    pub updated: Vec<u8>,
    /// Requirement changes, in file order
    pub changes: Vec<VersionChange>,
    /// New `go` directive value, when it was overridden
    pub go_version: Option<String>,
    /// Requirements that could not be resolved
    pub failures: usize,
}

impl UpgradeReport {
    /// Returns true if the output differs from the input
    pub fn is_changed(&self) -> bool {
        self.original != self.updated
    }
}

/// Upgrades go.mod files against a module proxy
pub struct Upgrader<'a> {
    proxy: &'a dyn ModuleProxy,
    options: UpgradeOptions,
}

impl<'a> Upgrader<'a> {
    /// Create a new Upgrader
    pub fn new(proxy: &'a dyn ModuleProxy, options: UpgradeOptions) -> Self {
        Self { proxy, options }
    }

    /// Upgrade manifest content read from `path`
    pub async fn upgrade(&self, path: &Path, data: &[u8]) -> Result<UpgradeReport, AppError> {
        let content = std::str::from_utf8(data)
            .map_err(|e| ManifestError::parse_error(path, 1, format!("not UTF-8: {}", e)))?;
        let mut file = GoMod::parse(path, content)?;

        let mut go_version = None;
        if let Some(target) = &self.options.go_version {
            if file.set_go_version(target) {
                go_version = Some(target.clone());
            }
        }

        let target = match file.go_version() {
            Some(v) => v.to_string(),
            None => {
                warn!(
                    "{} has no go directive; only versions without one are eligible",
                    path.display()
                );
                String::new()
            }
        };

        let selected: Vec<_> = file
            .requirements()
            .iter()
            .filter(|r| self.options.should_process(r))
            .cloned()
            .collect();

        let mut changes = Vec::new();
        let mut failures = 0;

        for req in selected {
            info!("checking {} {}", req.path, req.version);
            let resolution =
                match find_latest_compatible(self.proxy, &req.path, &req.version, &target).await {
                    Ok(resolution) => resolution,
                    Err(e) => {
                        warn!("skipping {}: {}", req.path, e);
                        failures += 1;
                        continue;
                    }
                };

            if let Resolution::Upgrade { version, .. } = resolution {
                if file.set_requirement_version(&req.path, &version) {
                    info!("{} {} -> {}", req.path, req.version, version);
                    changes.push(VersionChange {
                        module: req.path.clone(),
                        from: req.version.clone(),
                        to: version,
                    });
                }
            }
        }

        Ok(UpgradeReport {
            path: path.to_path_buf(),
            original: data.to_vec(),
            updated: file.format().into_bytes(),
            changes,
            go_version,
            failures,
        })
    }

    /// Upgrade the manifest at `path` and emit the result through `writer`
    pub async fn run(
        &self,
        path: &Path,
        writer: ChangeWriter,
        out: &mut dyn Write,
    ) -> Result<(UpgradeReport, WriteOutcome), AppError> {
        let data = read_manifest(path)?;
        let report = self.upgrade(path, &data).await?;

        let outcome = writer
            .emit(path, &report.original, &report.updated, out)
            .map_err(|e| ManifestError::write_error(path, e))?;
        if outcome == WriteOutcome::Unchanged {
            debug!("no changes");
        }

        Ok((report, outcome))
    }
}
