//! Manifest file detection, parsing and rewriting
//!
//! This module provides functionality to:
//! - Detect manifest files in a repository
//! - Parse declared dependencies from package.json, pyproject.toml, Gemfile and gemspec
//! - Rewrite a single dependency's version while preserving the surrounding text
//! - Apply eligible updates file by file (`ManifestWriter`)

mod detector;
mod gemfile;
mod gemspec;
mod package_json;
mod pyproject_toml;
mod writer;

pub use detector::{detect_manifests, ManifestInfo};
pub use gemfile::GemfileParser;
pub use gemspec::GemspecParser;
pub use package_json::PackageJsonParser;
pub use pyproject_toml::PyprojectTomlParser;
pub use writer::{read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::domain::{Dependency, FileType, VersionSpec};
use crate::error::ManifestError;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// A dependency as declared in a manifest, before it is tied to a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub current_version: String,
}

impl Declaration {
    pub fn new(name: impl Into<String>, current_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
        }
    }
}

/// Trait for parsing and rewriting manifest files
pub trait ManifestParser: Send + Sync {
    /// Parse declared dependencies from manifest content
    fn parse(&self, content: &str) -> Result<Vec<Declaration>, ManifestError>;

    /// Returns the format this parser handles
    fn file_type(&self) -> FileType;

    /// Update a dependency version in the manifest content
    ///
    /// Returns the content unchanged when the package is not declared.
    fn update_version(
        &self,
        content: &str,
        package: &str,
        new_version: &str,
    ) -> Result<String, ManifestError>;
}

/// Get a manifest parser for the specified format
pub fn get_parser(file_type: FileType) -> Box<dyn ManifestParser> {
    match file_type {
        FileType::PackageJson => Box::new(PackageJsonParser),
        FileType::PyprojectToml => Box::new(PyprojectTomlParser),
        FileType::Gemfile => Box::new(GemfileParser),
        FileType::Gemspec => Box::new(GemspecParser),
    }
}

/// Reads and parses one manifest into dependency records
///
/// Read and parse failures are logged and yield no records, so one broken
/// file never stops discovery elsewhere.
pub async fn parse_manifest(info: &ManifestInfo) -> Vec<Dependency> {
    let content = match tokio::fs::read_to_string(&info.path).await {
        Ok(content) => content,
        Err(e) => {
            let err = ManifestError::read_error(&info.path, e);
            tracing::warn!(path = %info.path.display(), "{}", err);
            return Vec::new();
        }
    };

    let parser = get_parser(info.file_type);
    match parser.parse(&content) {
        Ok(declarations) => {
            tracing::debug!(
                path = %info.path.display(),
                count = declarations.len(),
                "parsed manifest"
            );
            declarations
                .into_iter()
                .map(|decl| {
                    Dependency::new(
                        decl.name,
                        decl.current_version,
                        info.file_type,
                        info.repository.as_str(),
                        &info.repo_path,
                        &info.path,
                    )
                })
                .collect()
        }
        Err(e) => {
            tracing::warn!(path = %info.path.display(), "skipping manifest: {}", e);
            Vec::new()
        }
    }
}

/// Builds a pattern for one package, mapping failures to a manifest error
pub(crate) fn package_pattern(package: &str, pattern: String) -> Result<Regex, ManifestError> {
    Regex::new(&pattern).map_err(|e| ManifestError::invalid_pattern(package, e))
}

/// Applies `re` to every line, swapping capture group 2 for the new version
///
/// Group 1 and group 3 are kept verbatim; the old value's operator prefix is
/// carried over to the new version.
pub(crate) fn rewrite_quoted_version(content: &str, re: &Regex, new_version: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            re.replace(line, |caps: &Captures| {
                let spec = VersionSpec::parse(&caps[2]);
                format!("{}{}{}", &caps[1], spec.format_updated(new_version), &caps[3])
            })
        })
        .collect::<Vec<Cow<'_, str>>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_get_parser_file_types() {
        for file_type in [
            FileType::PackageJson,
            FileType::PyprojectToml,
            FileType::Gemfile,
            FileType::Gemspec,
        ] {
            assert_eq!(get_parser(file_type).file_type(), file_type);
        }
    }

    #[test]
    fn test_rewrite_quoted_version_keeps_other_lines() {
        let re = Regex::new(r#"^(\s*gem\s+["']rails["']\s*,\s*["'])([^"']+)(["'])"#).unwrap();
        let content = "source 'https://rubygems.org'\ngem 'rails', '~> 7.0'\n";
        let updated = rewrite_quoted_version(content, &re, "7.1.3");
        assert_eq!(updated, "source 'https://rubygems.org'\ngem 'rails', '~> 7.1.3'\n");
    }

    #[tokio::test]
    async fn test_parse_manifest_builds_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{"dependencies": {"left-pad": "1.0.0"}}"#).unwrap();

        let info = ManifestInfo::new(&path, FileType::PackageJson, "web", dir.path());
        let deps = parse_manifest(&info).await;

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].name, "left-pad");
        assert_eq!(deps[0].current_version, "1.0.0");
        assert_eq!(deps[0].repository, "web");
        assert_eq!(deps[0].file_path, path);
    }

    #[tokio::test]
    async fn test_parse_manifest_invalid_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ not json").unwrap();

        let info = ManifestInfo::new(&path, FileType::PackageJson, "web", dir.path());
        assert!(parse_manifest(&info).await.is_empty());
    }

    #[tokio::test]
    async fn test_parse_manifest_missing_file_yields_nothing() {
        let info = ManifestInfo::new(
            PathBuf::from("/nonexistent/Gemfile"),
            FileType::Gemfile,
            "shop",
            "/nonexistent",
        );
        assert!(parse_manifest(&info).await.is_empty());
    }
}
