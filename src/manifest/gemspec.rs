//! gemspec parser for Ruby gems
//!
//! Matches `add_dependency`, `add_runtime_dependency` and
//! `add_development_dependency` calls, with or without parentheses.

use crate::domain::FileType;
use crate::error::ManifestError;
use crate::manifest::{package_pattern, rewrite_quoted_version, Declaration, ManifestParser};
use regex::Regex;
use std::sync::LazyLock;

static ADD_DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\.(add_(?:development_|runtime_)?dependency)\s*\(?['"]([^'"]+)['"]\s*(?:,\s*['"]([^'"]+)['"])?"#,
    )
    .expect("Invalid regex")
});

/// Parser for *.gemspec files
pub struct GemspecParser;

impl ManifestParser for GemspecParser {
    fn parse(&self, content: &str) -> Result<Vec<Declaration>, ManifestError> {
        Ok(content
            .lines()
            .filter_map(|line| ADD_DEPENDENCY_RE.captures(line))
            .map(|caps| {
                let version = caps.get(3).map_or("*", |m| m.as_str());
                Declaration::new(&caps[2], version)
            })
            .collect())
    }

    fn file_type(&self) -> FileType {
        FileType::Gemspec
    }

    fn update_version(
        &self,
        content: &str,
        package: &str,
        new_version: &str,
    ) -> Result<String, ManifestError> {
        let re = package_pattern(
            package,
            format!(
                r#"(\.add_(?:development_|runtime_)?dependency\s*\(?["']{}["']\s*,\s*["'])([^"']+)(["'])"#,
                regex::escape(package)
            ),
        )?;
        Ok(rewrite_quoted_version(content, &re, new_version))
    }
}
