//! Manifest file detection
//!
//! Walks a repository recursively and collects every package.json,
//! pyproject.toml, Gemfile and *.gemspec, skipping `node_modules` and `.git`.

use crate::domain::FileType;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into
const PRUNED_DIRS: &[&str] = &["node_modules", ".git"];

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Format of the manifest
    pub file_type: FileType,
    /// Name of the repository the manifest belongs to
    pub repository: String,
    /// Root of that repository
    pub repo_path: PathBuf,
}

impl ManifestInfo {
    /// Create a new ManifestInfo
    pub fn new(
        path: impl Into<PathBuf>,
        file_type: FileType,
        repository: impl Into<String>,
        repo_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            path: path.into(),
            file_type,
            repository: repository.into(),
            repo_path: repo_path.into(),
        }
    }
}

fn is_pruned(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| PRUNED_DIRS.contains(&name))
}

/// Detect all manifest files under `repo_path`, sorted by path
pub fn detect_manifests(repo_path: &Path, repository: &str) -> Vec<ManifestInfo> {
    let mut manifests: Vec<ManifestInfo> = WalkDir::new(repo_path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let file_type = FileType::from_path(entry.path())?;
            Some(ManifestInfo::new(
                entry.path(),
                file_type,
                repository,
                repo_path,
            ))
        })
        .collect();

    manifests.sort_by(|a, b| a.path.cmp(&b.path));
    manifests
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_all_formats() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(dir.path().join("pyproject.toml"), "").unwrap();
        fs::write(dir.path().join("Gemfile"), "").unwrap();
        fs::write(dir.path().join("tool.gemspec"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let manifests = detect_manifests(dir.path(), "repo");
        let types: Vec<_> = manifests.iter().map(|m| m.file_type).collect();

        assert_eq!(manifests.len(), 4);
        assert!(types.contains(&FileType::PackageJson));
        assert!(types.contains(&FileType::PyprojectToml));
        assert!(types.contains(&FileType::Gemfile));
        assert!(types.contains(&FileType::Gemspec));
        assert!(manifests.iter().all(|m| m.repository == "repo"));
    }

    #[test]
    fn test_detect_nested_manifests() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("packages").join("ui");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(nested.join("package.json"), "{}").unwrap();

        let manifests = detect_manifests(dir.path(), "mono");
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].path, dir.path().join("package.json"));
        assert_eq!(manifests[1].path, nested.join("package.json"));
    }

    #[test]
    fn test_prunes_node_modules_and_git() {
        let dir = TempDir::new().unwrap();
        let vendored = dir.path().join("node_modules").join("lodash");
        let git = dir.path().join(".git");
        fs::create_dir_all(&vendored).unwrap();
        fs::create_dir_all(&git).unwrap();
        fs::write(vendored.join("package.json"), "{}").unwrap();
        fs::write(git.join("package.json"), "{}").unwrap();

        assert!(detect_manifests(dir.path(), "repo").is_empty());
    }

    #[test]
    fn test_detect_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(detect_manifests(dir.path(), "repo").is_empty());
    }
}
