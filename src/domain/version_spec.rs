//! Declared version constraints and prefix-preserving rewrites
//!
//! Handles constraints like:
//! - npm: `^1.2.3`, `~1.2.3`, `>=1.0.0`, `1.2.3`
//! - PyPI: `>=2.25.1`, `==1.0`, `~=3.1`
//! - RubyGems: `~> 7.0`, `>= 1.2`
//!
//! Everything before the first digit is treated as the prefix and is carried
//! over verbatim when a new version is written.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared version constraint split into operator prefix and version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// The raw value as it appears in the manifest
    pub raw: String,
    /// Leading non-digit text (e.g. `^`, `~> `, `>=`)
    pub prefix: String,
    /// The remainder, starting at the first digit
    pub version: String,
}

impl VersionSpec {
    /// Splits `raw` at its first ASCII digit
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let split = raw
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(raw.len());
        let (prefix, version) = raw.split_at(split);
        Self {
            prefix: prefix.to_string(),
            version: version.to_string(),
            raw,
        }
    }

    /// Formats a new version while preserving the original prefix
    pub fn format_updated(&self, new_version: &str) -> String {
        format!("{}{}", self.prefix, new_version)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
