//! Toolchain (`go` directive) versions and the compatibility check

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A `major.minor[.patch]` toolchain version such as `1.21` or `1.22.3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToolchainVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ToolchainVersion {
    /// Returns true if a module requiring `required` builds with this toolchain
    pub fn satisfies(&self, required: &ToolchainVersion) -> bool {
        self.major == required.major && self.minor >= required.minor
    }
}

impl FromStr for ToolchainVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidGoVersion {
            value: s.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() < 2 {
            return Err(invalid());
        }

        let major = parts[0].parse().map_err(|_| invalid())?;
        let minor = parts[1].parse().map_err(|_| invalid())?;
        let patch = match parts.get(2) {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };

        Ok(Self {
            major,
            minor,
            patch,
        })
    }
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse a dotted toolchain version; extra components beyond the third are ignored
pub fn parse_toolchain_version(s: &str) -> Result<ToolchainVersion, ConfigError> {
    s.parse()
}

/// Check a candidate's required toolchain against the target toolchain.
///
/// Unparseable input on either side counts as incompatible.
pub fn is_compatible(target: &str, required: &str) -> bool {
    match (
        target.parse::<ToolchainVersion>(),
        required.parse::<ToolchainVersion>(),
    ) {
        (Ok(target), Ok(required)) => target.satisfies(&required),
        _ => false,
    }
}

/// clap value parser for `--go`
pub fn parse_go_flag(s: &str) -> Result<String, String> {
    s.parse::<ToolchainVersion>()
        .map(|_| s.trim().to_string())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_major_minor() {
        let v: ToolchainVersion = "1.21".parse().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 21, 0));
    }

    #[test]
    fn test_parse_with_patch() {
        let v: ToolchainVersion = "1.22.3".parse().unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 22, 3));

        let v = parse_toolchain_version("1.22.3.7").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 22, 3));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("1".parse::<ToolchainVersion>().is_err());
        assert!("".parse::<ToolchainVersion>().is_err());
        assert!("1.x".parse::<ToolchainVersion>().is_err());
        assert!("1.21rc1".parse::<ToolchainVersion>().is_err());
        assert!("1.21.x".parse::<ToolchainVersion>().is_err());
    }

    #[test]
    fn test_compatible_matches_definition() {
        for c_major in 0..3u64 {
            for c_minor in 0..4u64 {
                for m_major in 0..3u64 {
                    for m_minor in 0..4u64 {
                        let target = format!("{}.{}", c_major, c_minor);
                        let required = format!("{}.{}", m_major, m_minor);
                        assert_eq!(
                            is_compatible(&target, &required),
                            c_major == m_major && c_minor >= m_minor,
                            "target {} required {}",
                            target,
                            required
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_patch_is_ignored() {
        assert!(is_compatible("1.21.0", "1.21.9"));
        assert!(is_compatible("1.21", "1.21.5"));
    }

    #[test]
    fn test_malformed_is_incompatible() {
        assert!(!is_compatible("garbage", "1.21"));
        assert!(!is_compatible("1.21", "garbage"));
        assert!(!is_compatible("", ""));
    }

    #[test]
    fn test_parse_go_flag() {
        assert_eq!(parse_go_flag("1.22").unwrap(), "1.22");
        assert!(parse_go_flag("one").is_err());
    }
}
