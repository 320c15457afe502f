//! Update judgment logic for dependencies
//!
//! This module provides:
//! - The version classifier (none / patch / minor / major)
//! - The safety policy deciding which resolved dependencies may be applied

mod classifier;

pub use classifier::{classify, coerce, extract_version};

use crate::domain::{Dependency, UpdateType};

/// Decides which resolved dependencies are eligible for a rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePolicy {
    /// Allow major version bumps
    pub unsafe_mode: bool,
}

impl UpdatePolicy {
    pub fn new(unsafe_mode: bool) -> Self {
        Self { unsafe_mode }
    }

    /// Latest is known, the update is real, and majors need unsafe mode
    pub fn is_eligible(&self, dependency: &Dependency) -> bool {
        let Some(update_type) = dependency.update_type else {
            return false;
        };
        dependency.latest_version.is_some()
            && update_type != UpdateType::None
            && (update_type != UpdateType::Major || self.unsafe_mode)
    }

    /// Filters `dependencies` down to the eligible ones
    pub fn eligible<'a>(
        &'a self,
        dependencies: &'a [Dependency],
    ) -> impl Iterator<Item = &'a Dependency> + 'a {
        dependencies.iter().filter(|d| self.is_eligible(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileType;

    fn dep(latest: Option<&str>, update_type: Option<UpdateType>) -> Dependency {
        let mut d = Dependency::new(
            "react",
            "17.0.0",
            FileType::PackageJson,
            "web",
            "/src/web",
            "/src/web/package.json",
        );
        d.latest_version = latest.map(str::to_string);
        d.update_type = update_type;
        d
    }

    #[test]
    fn test_patch_and_minor_always_eligible() {
        let policy = UpdatePolicy::default();
        assert!(policy.is_eligible(&dep(Some("17.0.1"), Some(UpdateType::Patch))));
        assert!(policy.is_eligible(&dep(Some("17.1.0"), Some(UpdateType::Minor))));
    }

    #[test]
    fn test_major_requires_unsafe() {
        let major = dep(Some("18.2.0"), Some(UpdateType::Major));
        assert!(!UpdatePolicy::new(false).is_eligible(&major));
        assert!(UpdatePolicy::new(true).is_eligible(&major));
    }

    #[test]
    fn test_none_and_unresolved_never_eligible() {
        let policy = UpdatePolicy::new(true);
        assert!(!policy.is_eligible(&dep(Some("17.0.0"), Some(UpdateType::None))));
        assert!(!policy.is_eligible(&dep(None, None)));
        assert!(!policy.is_eligible(&dep(None, Some(UpdateType::Patch))));
    }

    #[test]
    fn test_eligible_filters() {
        let deps = vec![
            dep(Some("17.0.1"), Some(UpdateType::Patch)),
            dep(Some("18.2.0"), Some(UpdateType::Major)),
        ];
        assert_eq!(UpdatePolicy::new(false).eligible(&deps).count(), 1);
        assert_eq!(UpdatePolicy::new(true).eligible(&deps).count(), 2);
    }
}
