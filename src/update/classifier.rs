//! Version classifier
//!
//! Compares a declared constraint against the latest published version and
//! decides how risky the jump is. Constraint strings are coerced rather than
//! parsed strictly, so `>=1.2.3`, `~> 7.0` and `^4` all classify.

use crate::domain::UpdateType;
use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

static FULL_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("Invalid regex"));

static COERCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("Invalid regex")
});

/// Returns the first `X.Y.Z` substring, or the input unchanged
pub fn extract_version(raw: &str) -> &str {
    FULL_VERSION
        .find(raw)
        .map(|m| m.as_str())
        .unwrap_or(raw)
}

/// Coerces the first numeric run into a version, filling missing parts with 0
pub fn coerce(raw: &str) -> Option<Version> {
    let caps = COERCE.captures(raw)?;
    let part = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Classifies the update from `current` to `latest`
pub fn classify(current: &str, latest: &str) -> UpdateType {
    let current = extract_version(current);
    let latest = extract_version(latest);

    if current == latest {
        return UpdateType::None;
    }

    let (Some(current), Some(latest)) = (coerce(current), coerce(latest)) else {
        return UpdateType::None;
    };

    let components = [
        (latest.major.cmp(&current.major), UpdateType::Major),
        (latest.minor.cmp(&current.minor), UpdateType::Minor),
        (latest.patch.cmp(&current.patch), UpdateType::Patch),
    ];

    for (ordering, update_type) in components {
        match ordering {
            Ordering::Greater => return update_type,
            // The first differing component decides, so a lower latest is never an update
            // even if a later component is higher (1.5.3 -> 1.4.9 is none, not patch)
            Ordering::Less => return UpdateType::None,
            Ordering::Equal => {}
        }
    }

    UpdateType::None
}
