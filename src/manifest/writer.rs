//! Manifest file writing and update operations
//!
//! This module provides:
//! - ManifestWriter for applying eligible version updates to manifest files
//! - Dry-run mode support (no file I/O at all)
//! - One read and at most one write per file
//! - Per-file error isolation

use crate::domain::{AppliedUpdate, Dependency};
use crate::error::ManifestError;
use crate::manifest::{get_parser, ManifestParser};
use crate::update::UpdatePolicy;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Writer for manifest files that applies version updates
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
    /// Which resolved dependencies may be applied
    policy: UpdatePolicy,
}

/// Result of applying updates to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Updates that changed the file (or would, in dry-run mode)
    pub applied: Vec<AppliedUpdate>,
    /// Whether the file was actually written
    pub file_modified: bool,
    /// Errors encountered during update
    pub errors: Vec<String>,
}

impl WriteResult {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            applied: Vec::new(),
            file_modified: false,
            errors: Vec::new(),
        }
    }

    /// Returns true if any errors occurred
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool, policy: UpdatePolicy) -> Self {
        Self { dry_run, policy }
    }

    /// Applies every eligible dependency, grouped by file
    ///
    /// Files without eligible dependencies are not touched and produce no
    /// result. A failure in one file is recorded in its result and the
    /// remaining files are still processed.
    pub async fn apply_all(&self, dependencies: &[Dependency]) -> Vec<WriteResult> {
        let mut by_file: BTreeMap<&Path, Vec<&Dependency>> = BTreeMap::new();
        for dep in self.policy.eligible(dependencies) {
            by_file.entry(dep.file_path.as_path()).or_default().push(dep);
        }

        let mut results = Vec::with_capacity(by_file.len());
        for (path, deps) in by_file {
            if self.dry_run {
                results.push(Self::preview(path, &deps));
                continue;
            }

            let parser = get_parser(deps[0].file_type);
            match self.apply_file(path, &deps, parser.as_ref()).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(path = %path.display(), "failed to update manifest: {}", e);
                    let mut result = WriteResult::new(path);
                    result.errors.push(e.to_string());
                    results.push(result);
                }
            }
        }

        results
    }

    /// Dry-run result: every eligible dependency "would update"
    fn preview(path: &Path, deps: &[&Dependency]) -> WriteResult {
        let mut result = WriteResult::new(path);
        result.applied = deps
            .iter()
            .filter_map(|dep| {
                let latest = dep.latest_version.as_deref()?;
                Some(AppliedUpdate::new((*dep).clone(), latest))
            })
            .collect();
        result
    }

    /// Reads `path` once, rewrites each dependency in turn and writes only on change
    ///
    /// A record whose declaration was already rewritten by an earlier record
    /// of the same name still counts as applied once the file is written.
    pub async fn apply_file(
        &self,
        path: &Path,
        deps: &[&Dependency],
        parser: &dyn ManifestParser,
    ) -> Result<WriteResult, ManifestError> {
        let mut result = WriteResult::new(path);
        let original = read_manifest(path).await?;
        let mut current = original.clone();
        let mut unchanged = Vec::new();

        for dep in deps {
            let Some(latest) = dep.latest_version.as_deref() else {
                continue;
            };
            match parser.update_version(&current, &dep.name, latest) {
                Ok(updated) if updated != current => {
                    current = updated;
                    result.applied.push(AppliedUpdate::new((*dep).clone(), latest));
                }
                Ok(_) => unchanged.push((*dep, latest)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), package = %dep.name, "{}", e);
                    result
                        .errors
                        .push(format!("Failed to update {}: {}", dep.name, e));
                }
            }
        }

        if current == original {
            return Ok(result);
        }

        write_manifest(path, &current).await?;
        result.file_modified = true;

        let declared = parser.parse(&current).unwrap_or_default();
        for (dep, latest) in unchanged {
            let expected = dep.version_spec().format_updated(latest);
            if declared
                .iter()
                .any(|d| d.name == dep.name && d.current_version == expected)
            {
                result.applied.push(AppliedUpdate::new(dep.clone(), latest));
            } else {
                tracing::debug!(
                    path = %path.display(),
                    package = %dep.name,
                    "declaration not rewritten"
                );
            }
        }

        Ok(result)
    }
}

/// Read a manifest file content
pub async fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub async fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ManifestError::write_error(path, e))
}
