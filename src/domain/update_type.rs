//! Semantic-versioning severity of an available update

use serde::{Deserialize, Serialize};
use std::fmt;

/// How far the latest published version is from the declared one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// Up to date, a downgrade, or not classifiable
    None,
    Patch,
    Minor,
    /// Breaking change; only applied in unsafe mode
    Major,
}

impl UpdateType {
    /// Report symbol for this update type
    pub fn symbol(&self) -> &'static str {
        match self {
            UpdateType::Major => "✗",
            UpdateType::Minor => "△",
            UpdateType::Patch => "✓",
            UpdateType::None => "·",
        }
    }

    pub fn is_major(&self) -> bool {
        matches!(self, UpdateType::Major)
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateType::None => "none",
            UpdateType::Patch => "patch",
            UpdateType::Minor => "minor",
            UpdateType::Major => "major",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(UpdateType::Major.symbol(), "✗");
        assert_eq!(UpdateType::Minor.symbol(), "△");
        assert_eq!(UpdateType::Patch.symbol(), "✓");
    }

    #[test]
    fn test_ordering_by_severity() {
        assert!(UpdateType::Major > UpdateType::Minor);
        assert!(UpdateType::Minor > UpdateType::Patch);
        assert!(UpdateType::Patch > UpdateType::None);
    }

    #[test]
    fn test_display() {
        assert_eq!(UpdateType::Minor.to_string(), "minor");
        assert_eq!(UpdateType::None.to_string(), "none");
    }
}
