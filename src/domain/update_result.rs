//! Result of applying an update

use super::Dependency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency that was (or in dry-run mode, would be) rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedUpdate {
    /// The dependency as it was declared before the rewrite
    pub dependency: Dependency,
    /// The version that was written
    pub new_version: String,
}

impl AppliedUpdate {
    pub fn new(dependency: Dependency, new_version: impl Into<String>) -> Self {
        Self {
            dependency,
            new_version: new_version.into(),
        }
    }

    /// The old declared value
    pub fn old_version(&self) -> &str {
        &self.dependency.current_version
    }

    /// The new declared value, with the original prefix carried over
    pub fn new_declared(&self) -> String {
        self.dependency.version_spec().format_updated(&self.new_version)
    }
}

impl fmt::Display for AppliedUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.dependency.name,
            self.old_version(),
            self.new_declared()
        )
    }
}
