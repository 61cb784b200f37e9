//! Upgrade options
//!
//! This module provides the UpgradeOptions struct that encapsulates
//! which requirements are considered and which toolchain they must fit.

use crate::manifest::Requirement;

/// Options controlling a manifest upgrade
#[derive(Debug, Clone, Default)]
pub struct UpgradeOptions {
    /// Also upgrade requirements marked `// indirect`
    pub include_indirect: bool,
    /// Toolchain version overriding the manifest's `go` directive
    pub go_version: Option<String>,
}

impl UpgradeOptions {
    /// Create options with default settings (direct requirements only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether indirect requirements are upgraded
    pub fn with_indirect(mut self, include: bool) -> Self {
        self.include_indirect = include;
        self
    }

    /// Set the target toolchain version
    pub fn with_go_version(mut self, version: impl Into<String>) -> Self {
        self.go_version = Some(version.into());
        self
    }

    /// Check if a requirement should be upgraded
    pub fn should_process(&self, requirement: &Requirement) -> bool {
        !requirement.indirect || self.include_indirect
    }
}
