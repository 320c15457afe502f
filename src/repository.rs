//! Repository discovery
//!
//! A repository is any directory containing `.git`. Without a target, every
//! immediate sub-directory of the base directory that is a repository gets
//! processed.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// A git repository to process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Final path component, used as the display name
    pub name: String,
    pub path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

fn is_git_repository(path: &Path) -> bool {
    path.is_dir() && path.join(".git").exists()
}

/// Finds the repositories to process
///
/// `target` may be absolute or relative to `base_dir`. An invalid target or an
/// unreadable base directory is fatal.
pub fn discover_repositories(
    base_dir: &Path,
    target: Option<&Path>,
) -> Result<Vec<Repository>, ConfigError> {
    if let Some(target) = target {
        let path = if target.is_absolute() {
            target.to_path_buf()
        } else {
            base_dir.join(target)
        };
        if !is_git_repository(&path) {
            return Err(ConfigError::InvalidRepository { path });
        }
        return Ok(vec![Repository::new(path)]);
    }

    let entries = std::fs::read_dir(base_dir).map_err(|source| ConfigError::UnreadableBaseDir {
        path: base_dir.to_path_buf(),
        source,
    })?;

    let mut repositories: Vec<Repository> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_git_repository(path))
        .map(Repository::new)
        .collect();
    repositories.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!(
        base_dir = %base_dir.display(),
        count = repositories.len(),
        "discovered repositories"
    );
    Ok(repositories)
}
