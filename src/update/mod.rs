//! go.mod upgrades
//!
//! This module provides:
//! - Upgrade options (indirect requirements, toolchain override)
//! - The latest compatible version search
//! - The upgrade workflow that rewrites a manifest

mod filter;
mod search;
mod upgrader;

pub use filter::UpgradeOptions;
pub use search::{find_latest_compatible, Basis, Resolution, ScanStop};
pub use upgrader::{UpgradeReport, Upgrader, VersionChange};
