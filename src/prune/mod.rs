//! Module cache pruning
//!
//! This module provides:
//! - The retention set built from every go.mod below a project root
//! - The comparison of that set against the module cache entries
//! - Removal (or dry-run reporting) of the entries nobody references

mod cache;

pub use cache::{remove_entry, scan_entries, CacheEntry};

use crate::error::{AppError, ConfigError, IoError};
use crate::manifest::detect_manifests;
use crate::package_manager::{GoToolchain, ListedModule};
use crate::proxy::escape_path;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for a prune run
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
    /// Only report what would be removed
    pub dry_run: bool,
    /// Log every removal
    pub verbose: bool,
}

/// Outcome of a prune run
#[derive(Debug, Clone, Default)]
pub struct PruneReport {
    /// Number of manifests that contributed to the retention set
    pub manifests: usize,
    /// Number of cache entries kept
    pub kept: usize,
    /// Entries removed, or that would be removed in dry-run mode
    pub removed: Vec<PathBuf>,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl PruneReport {
    /// Number of entries removed or to be removed
    pub fn total(&self) -> usize {
        self.removed.len()
    }
}

/// Resolve the module cache root from an explicit value or `go env GOMODCACHE`
pub fn resolve_mod_cache(
    explicit: Option<&Path>,
    toolchain: &dyn GoToolchain,
) -> Result<PathBuf, AppError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }

    let value = toolchain.env("GOMODCACHE")?;
    if value.is_empty() {
        return Err(ConfigError::MissingModCache.into());
    }
    Ok(PathBuf::from(value))
}

/// Cache keys a listed module keeps alive
fn retention_keys(module: &ListedModule) -> Vec<String> {
    let mut keys = Vec::with_capacity(2);
    for m in std::iter::once(module).chain(module.replace.as_deref()) {
        if m.version.is_empty() {
            continue;
        }
        keys.push(format!("{}@{}", escape_path(&m.path), escape_path(&m.version)));
    }
    keys
}

/// Removes module cache entries no manifest under a root refers to
pub struct CachePruner<'a> {
    toolchain: &'a dyn GoToolchain,
    options: PruneOptions,
}

impl<'a> CachePruner<'a> {
    /// Create a new CachePruner
    pub fn new(toolchain: &'a dyn GoToolchain, options: PruneOptions) -> Self {
        Self { toolchain, options }
    }

    /// Collect the cache keys of every module required below `root`.
    ///
    /// Returns the retention set and the number of manifests consulted.
    pub fn retained_modules(&self, root: &Path) -> Result<(BTreeSet<String>, usize), AppError> {
        if !root.exists() {
            return Err(IoError::directory_not_found(root).into());
        }
        if !root.is_dir() {
            return Err(IoError::not_a_directory(root).into());
        }

        let manifests = detect_manifests(root)?;
        let mut keep = BTreeSet::new();

        for manifest in &manifests {
            let dir = manifest.parent().unwrap_or(root);
            debug!("listing modules of {}", manifest.display());
            for module in self.toolchain.list_modules(dir)? {
                debug!("retaining {}", module.describe());
                keep.extend(retention_keys(&module));
            }
        }

        Ok((keep, manifests.len()))
    }

    /// Remove, or report, every cache entry missing from `keep`
    pub fn prune_cache(
        &self,
        cache_root: &Path,
        keep: &BTreeSet<String>,
    ) -> Result<PruneReport, AppError> {
        let mut report = PruneReport {
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        for entry in scan_entries(cache_root)? {
            if keep.contains(&entry.key) {
                report.kept += 1;
                continue;
            }

            if self.options.dry_run {
                info!("Would remove: {}", entry.path.display());
            } else {
                if self.options.verbose {
                    info!("Removing: {}", entry.path.display());
                } else {
                    debug!("Removing: {}", entry.path.display());
                }
                remove_entry(&entry.path)?;
            }
            report.removed.push(entry.path);
        }

        info!("Total modules to remove: {}", report.total());
        Ok(report)
    }

    /// Build the retention set for `root` and prune `cache_root` against it
    pub fn run(&self, root: &Path, cache_root: &Path) -> Result<PruneReport, AppError> {
        let (keep, manifests) = self.retained_modules(root)?;
        let mut report = self.prune_cache(cache_root, &keep)?;
        report.manifests = manifests;
        Ok(report)
    }
}
