//! Latest compatible version search
//!
//! Walks a module's versions newest first and picks the first stable
//! release, in the pinned major, newer than the pin, whose declared `go`
//! version the target toolchain satisfies.

use crate::error::{AppError, ManifestError};
use crate::proxy::ModuleProxy;
use crate::version::{is_compatible, ModuleVersion};
use tracing::{debug, error};

/// Why a candidate was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// Its declared go version is satisfied by the target toolchain
    Compatible,
    /// It declares no go version and is assumed compatible
    NoToolchainRequirement,
}

/// Why the search ended without a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStop {
    /// Reached a candidate in another major version
    MajorChanged { candidate: String },
    /// Reached a candidate that is not newer than the pinned version
    NotNewer { candidate: String },
    /// Ran out of candidates
    Exhausted,
}

/// Outcome of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Move the requirement to `version`
    Upgrade { version: String, basis: Basis },
    /// Leave the requirement as it is
    Unchanged(ScanStop),
}

impl Resolution {
    /// The version to upgrade to, if any
    pub fn version(&self) -> Option<&str> {
        match self {
            Resolution::Upgrade { version, .. } => Some(version),
            Resolution::Unchanged(_) => None,
        }
    }
}

/// Where a candidate stands relative to the pinned version
enum Placement {
    Eligible,
    OtherMajor,
    NotNewer,
}

fn place(candidate: &ModuleVersion, pinned: &ModuleVersion) -> Placement {
    if candidate.major() != pinned.major() {
        Placement::OtherMajor
    } else if !candidate.is_newer_than(pinned) {
        Placement::NotNewer
    } else {
        Placement::Eligible
    }
}

/// Find the newest version of `module` that can replace `pinned` under `target_go`.
///
/// A malformed pinned version or a failed version listing is an error. Invalid
/// and prerelease candidates are skipped, as are candidates whose go.mod
/// cannot be fetched. The versions are sorted, so the scan stops at the first
/// candidate from another major or not newer than the pin. A candidate
/// without a `go` directive is accepted and ends the scan.
pub async fn find_latest_compatible(
    proxy: &dyn ModuleProxy,
    module: &str,
    pinned: &str,
    target_go: &str,
) -> Result<Resolution, AppError> {
    let versions = proxy.list_versions(module).await?;
    let pinned_version = ModuleVersion::parse(pinned)
        .ok_or_else(|| ManifestError::invalid_version(module, pinned))?;

    for raw in &versions {
        let candidate = match ModuleVersion::parse(raw) {
            Some(v) if !v.is_prerelease() => v,
            _ => continue,
        };

        match place(&candidate, &pinned_version) {
            Placement::OtherMajor => {
                return Ok(Resolution::Unchanged(ScanStop::MajorChanged {
                    candidate: raw.clone(),
                }));
            }
            Placement::NotNewer => {
                return Ok(Resolution::Unchanged(ScanStop::NotNewer {
                    candidate: raw.clone(),
                }));
            }
            Placement::Eligible => {}
        }

        let go_mod = match proxy.fetch_mod(module, raw).await {
            Ok(file) => file,
            Err(e) => {
                error!("get mod file {}@{} failed: {}", module, raw, e);
                continue;
            }
        };

        match go_mod.go_version() {
            None => {
                return Ok(Resolution::Upgrade {
                    version: raw.clone(),
                    basis: Basis::NoToolchainRequirement,
                });
            }
            Some(required) if is_compatible(target_go, required) => {
                return Ok(Resolution::Upgrade {
                    version: raw.clone(),
                    basis: Basis::Compatible,
                });
            }
            Some(required) => {
                debug!(
                    "{}@{} requires go {}, target is {}",
                    module, raw, required, target_go
                );
            }
        }
    }

    Ok(Resolution::Unchanged(ScanStop::Exhausted))
}
