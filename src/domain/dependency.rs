//! Dependency information structures

use super::{FileType, Manager, UpdateType, VersionSpec};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identity used for registry lookups: one request per unique key
pub type DependencyKey = (Manager, String);

/// One declared dependency occurrence in one manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name as declared (registry lookup key)
    pub name: String,
    /// Raw declared version or constraint text
    pub current_version: String,
    /// Latest published version, once resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    pub manager: Manager,
    /// Assigned only once `latest_version` is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_type: Option<UpdateType>,
    /// Name of the owning repository
    pub repository: String,
    pub repo_path: PathBuf,
    pub file_path: PathBuf,
    pub file_type: FileType,
}

impl Dependency {
    /// Creates an unresolved dependency declared in `file_path`
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        file_type: FileType,
        repository: impl Into<String>,
        repo_path: impl Into<PathBuf>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: current_version.into(),
            latest_version: None,
            manager: file_type.manager(),
            update_type: None,
            repository: repository.into(),
            repo_path: repo_path.into(),
            file_path: file_path.into(),
            file_type,
        }
    }

    /// Registry lookup key
    pub fn key(&self) -> DependencyKey {
        (self.manager, self.name.clone())
    }

    /// The declared constraint split into prefix and version
    pub fn version_spec(&self) -> VersionSpec {
        VersionSpec::parse(self.current_version.as_str())
    }

    /// True if this occurrence is the same dependency as `other` in the same repository
    pub fn same_declaration(&self, other: &Dependency) -> bool {
        self.manager == other.manager
            && self.name == other.name
            && self.repository == other.repository
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} [{}]",
            self.name, self.current_version, self.manager
        )
    }
}
