//! Human-readable summaries
//!
//! This module provides:
//! - The upgrade summary modup prints after rewriting a manifest
//! - The prune summary modclean prints after scanning the cache
//! - Semantic version change type indication (major/minor/patch)

use crate::prune::PruneReport;
use crate::update::{UpgradeReport, VersionChange};
use crate::version::ModuleVersion;
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn from_versions(old: &str, new: &str) -> Self {
        match (ModuleVersion::parse(old), ModuleVersion::parse(new)) {
            (Some(old), Some(new)) => {
                if old.major() != new.major() {
                    VersionChangeType::Major
                } else if old.minor() != new.minor() {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for summaries
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format_change(
        &self,
        change: &VersionChange,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let change_type = VersionChangeType::from_versions(&change.from, &change.to);

        if self.color {
            writeln!(
                writer,
                "  {:width$} {} {} {} [{}]",
                change.module,
                change.from.dimmed(),
                "→".dimmed(),
                change.to.bright_white().bold(),
                change_type.colored_label(),
                width = width
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]",
                change.module,
                change.from,
                change.to,
                change_type.label(),
                width = width
            )
        }
    }

    /// Summarize an upgrade
    pub fn format_upgrade(
        &self,
        report: &UpgradeReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let header = report.path.display().to_string();
        if self.color {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }

        if let Some(go) = &report.go_version {
            writeln!(writer, "  go directive set to {}", go)?;
        }

        let width = report
            .changes
            .iter()
            .map(|c| c.module.len())
            .max()
            .unwrap_or(0);
        for change in &report.changes {
            self.format_change(change, width, writer)?;
        }

        let count = report.changes.len();
        let noun = if count == 1 { "module" } else { "modules" };
        let summary = format!("{} {} upgraded", count, noun);
        if self.color && count > 0 {
            writeln!(writer, "{}", summary.green())?;
        } else {
            writeln!(writer, "{}", summary)?;
        }

        if report.failures > 0 {
            let failed = format!("{} could not be resolved", report.failures);
            if self.color {
                writeln!(writer, "{}", failed.yellow())?;
            } else {
                writeln!(writer, "{}", failed)?;
            }
        }
        Ok(())
    }

    /// Summarize a prune run
    pub fn format_prune(&self, report: &PruneReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let verb = if report.dry_run {
            "would be removed"
        } else {
            "removed"
        };
        let summary = format!(
            "{} manifests scanned, {} cache entries kept, {} {}",
            report.manifests,
            report.kept,
            report.total(),
            verb
        );

        if self.color {
            let prefix = if report.dry_run {
                format!("{} ", "(dry-run)".cyan())
            } else {
                String::new()
            };
            writeln!(writer, "{}{}", prefix, summary.bold())
        } else {
            let prefix = if report.dry_run { "(dry-run) " } else { "" };
            writeln!(writer, "{}{}", prefix, summary)
        }
    }
}
