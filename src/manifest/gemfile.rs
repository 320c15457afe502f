//! Gemfile parser for Ruby projects
//!
//! Handles:
//! - `gem "name"` declarations (version defaults to `*`)
//! - `gem "name", "~> 7.0"` with a version constraint
//! - Single or double quotes

use crate::domain::FileType;
use crate::error::ManifestError;
use crate::manifest::{package_pattern, rewrite_quoted_version, Declaration, ManifestParser};
use regex::Regex;
use std::sync::LazyLock;

static GEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*gem\s+['"]([^'"]+)['"]\s*(?:,\s*['"]([^'"]+)['"])?"#)
        .expect("Invalid regex")
});

/// Parser for Gemfile files
pub struct GemfileParser;

impl ManifestParser for GemfileParser {
    fn parse(&self, content: &str) -> Result<Vec<Declaration>, ManifestError> {
        Ok(content
            .lines()
            .filter_map(|line| GEM_RE.captures(line))
            .map(|caps| {
                let version = caps.get(2).map_or("*", |m| m.as_str());
                Declaration::new(&caps[1], version)
            })
            .collect())
    }

    fn file_type(&self) -> FileType {
        FileType::Gemfile
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
                r#"^(\s*gem\s+["']{}["']\s*,\s*["'])([^"']+)(["'])"#,
                regex::escape(package)
            ),
        )?;
        Ok(rewrite_quoted_version(content, &re, new_version))
    }
}
