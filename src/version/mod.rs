//! Go module version handling
//!
//! Handles version formats:
//! - Semantic version: `v1.2.3`
//! - Prerelease: `v1.2.3-beta.1`
//! - Pseudo-version: `v0.0.0-20210101120000-abcdef123456` (a prerelease)
//! - Incompatible: `v2.0.0+incompatible`
//!
//! Shorthands `v1` and `v1.2` are valid and stand for `v1.0.0` and `v1.2.0`.

pub mod toolchain;

pub use toolchain::{is_compatible, parse_toolchain_version, ToolchainVersion};

use std::cmp::Ordering;
use std::fmt;

/// A valid module version, keeping the string it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVersion {
    raw: String,
    parsed: semver::Version,
}

impl ModuleVersion {
    /// Parse a module version, returning None when it is not valid semver
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix('v')?;
        let core_end = rest.find(['-', '+']).unwrap_or(rest.len());
        let has_tail = core_end < rest.len();

        let canonical = match rest[..core_end].split('.').count() {
            1 if !has_tail => format!("{}.0.0", rest),
            2 if !has_tail => format!("{}.0", rest),
            3 => rest.to_string(),
            _ => return None,
        };

        let parsed = semver::Version::parse(&canonical).ok()?;
        Some(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The version as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Major version number
    pub fn major(&self) -> u64 {
        self.parsed.major
    }

    /// Minor version number
    pub fn minor(&self) -> u64 {
        self.parsed.minor
    }

    /// Returns true for prereleases, pseudo-versions included
    pub fn is_prerelease(&self) -> bool {
        !self.parsed.pre.is_empty()
    }

    /// Returns true if this version has higher precedence than `other`
    pub fn is_newer_than(&self, other: &ModuleVersion) -> bool {
        self.cmp_precedence(other) == Ordering::Greater
    }

    /// Semver precedence; build metadata such as `+incompatible` is ignored
    pub fn cmp_precedence(&self, other: &ModuleVersion) -> Ordering {
        let a = &self.parsed;
        let b = &other.parsed;
        (a.major, a.minor, a.patch)
            .cmp(&(b.major, b.minor, b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns true if `version` is a valid module version
pub fn is_valid(version: &str) -> bool {
    ModuleVersion::parse(version).is_some()
}

/// Compare two version strings by precedence.
///
/// Invalid versions compare less than valid ones and equal to each other.
pub fn compare(a: &str, b: &str) -> Ordering {
    match (ModuleVersion::parse(a), ModuleVersion::parse(b)) {
        (Some(a), Some(b)) => a.cmp_precedence(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Sort versions newest first; ties fall back to string order
pub fn sort_descending(versions: &mut [String]) {
    versions.sort_by(|a, b| compare(b, a).then_with(|| b.cmp(a)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ModuleVersion {
        ModuleVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_semver() {
        let version = v("v1.2.3");
        assert_eq!(version.major(), 1);
        assert_eq!(version.as_str(), "v1.2.3");
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_shorthand() {
        assert_eq!(v("v1").cmp_precedence(&v("v1.0.0")), Ordering::Equal);
        assert_eq!(v("v1.4").cmp_precedence(&v("v1.4.0")), Ordering::Equal);
        assert!(ModuleVersion::parse("v1.4-beta").is_none());
    }

    #[test]
    fn test_parse_requires_v_prefix() {
        assert!(ModuleVersion::parse("1.2.3").is_none());
        assert!(ModuleVersion::parse("").is_none());
        assert!(ModuleVersion::parse("latest").is_none());
    }

    #[test]
    fn test_parse_rejects_leading_zero() {
        assert!(ModuleVersion::parse("v1.02.3").is_none());
    }

    #[test]
    fn test_pseudo_version_is_prerelease() {
        let version = v("v0.0.0-20210101120000-abcdef123456");
        assert!(version.is_prerelease());
        assert_eq!(version.major(), 0);
    }

    #[test]
    fn test_incompatible_is_release() {
        let version = v("v2.0.0+incompatible");
        assert!(!version.is_prerelease());
        assert_eq!(version.major(), 2);
        assert_eq!(version.cmp_precedence(&v("v2.0.0")), Ordering::Equal);
    }

    #[test]
    fn test_is_newer_than() {
        assert!(v("v1.10.0").is_newer_than(&v("v1.9.0")));
        assert!(v("v1.0.0").is_newer_than(&v("v1.0.0-rc.1")));
        assert!(!v("v1.0.0").is_newer_than(&v("v1.0.0")));
    }

    #[test]
    fn test_compare_invalid_sorts_low() {
        assert_eq!(compare("v1.0.0", "garbage"), Ordering::Greater);
        assert_eq!(compare("garbage", "v0.0.1"), Ordering::Less);
        assert_eq!(compare("foo", "bar"), Ordering::Equal);
    }

    #[test]
    fn test_sort_descending() {
        let mut versions = vec![
            "v1.2.0".to_string(),
            "bogus".to_string(),
            "v1.10.0".to_string(),
            "v1.10.0-rc.1".to_string(),
            "v0.9.0".to_string(),
        ];
        sort_descending(&mut versions);
        assert_eq!(
            versions,
            vec!["v1.10.0", "v1.10.0-rc.1", "v1.2.0", "v0.9.0", "bogus"]
        );
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("v1.2.3-beta.1"));
        assert!(!is_valid("v1.2.3.4"));
    }
}
