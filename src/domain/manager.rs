//! Package managers and the manifest formats that belong to them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Manager {
    /// npm registry (package.json)
    Npm,
    /// Python Package Index (pyproject.toml)
    Pypi,
    /// RubyGems (Gemfile, *.gemspec)
    Rubygems,
}

impl Manager {
    /// Returns the display name for this manager
    pub fn display_name(&self) -> &'static str {
        match self {
            Manager::Npm => "npm",
            Manager::Pypi => "PyPI",
            Manager::Rubygems => "RubyGems",
        }
    }

    /// Number of registry requests issued concurrently per batch
    pub fn batch_size(&self) -> usize {
        match self {
            Manager::Npm => 20,
            Manager::Pypi => 10,
            Manager::Rubygems => 10,
        }
    }

    /// Returns all supported managers
    pub fn all() -> &'static [Manager] {
        &[Manager::Npm, Manager::Pypi, Manager::Rubygems]
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Manifest formats, each with its own rewrite grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "package.json")]
    PackageJson,
    #[serde(rename = "pyproject.toml")]
    PyprojectToml,
    #[serde(rename = "gemfile")]
    Gemfile,
    #[serde(rename = "gemspec")]
    Gemspec,
}

impl FileType {
    /// The manager whose registry resolves dependencies of this format
    pub fn manager(&self) -> Manager {
        match self {
            FileType::PackageJson => Manager::Npm,
            FileType::PyprojectToml => Manager::Pypi,
            FileType::Gemfile | FileType::Gemspec => Manager::Rubygems,
        }
    }

    /// Detects the format from a file path, by file name
    pub fn from_path(path: &Path) -> Option<FileType> {
        let file_name = path.file_name()?.to_str()?;
        match file_name {
            "package.json" => Some(FileType::PackageJson),
            "pyproject.toml" => Some(FileType::PyprojectToml),
            "Gemfile" => Some(FileType::Gemfile),
            name if name.ends_with(".gemspec") && name.len() > ".gemspec".len() => {
                Some(FileType::Gemspec)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::PackageJson => "package.json",
            FileType::PyprojectToml => "pyproject.toml",
            FileType::Gemfile => "gemfile",
            FileType::Gemspec => "gemspec",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
