//! Error types for bump
//!
//! - ManifestError: reading, parsing or rewriting one manifest (never fatal)
//! - RegistryError: one registry lookup (retried, then reported)
//! - ConfigError: bad run input, the only fatal kind
//! - CommandError: an external git / package manager command

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can end a run
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// package.json
    #[error("{path} is not valid JSON: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// pyproject.toml
    #[error("{path} is not valid TOML: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// The package name produced an unusable rewrite regex
    #[error("cannot build rewrite pattern for '{package}': {message}")]
    InvalidPattern { package: String, message: String },
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{registry} has no package named '{package}'")]
    PackageNotFound { package: String, registry: String },

    /// Transport failure or non-success status
    #[error("{registry} request for '{package}' failed: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// HTTP 429
    #[error("{registry} rate limit hit while fetching '{package}'")]
    RateLimited {
        package: String,
        registry: String,
        /// Numeric `Retry-After` header, when sent
        retry_after: Option<Duration>,
    },

    #[error("unexpected {registry} response for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    #[error("{registry} timed out fetching '{package}'")]
    Timeout { package: String, registry: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{path} is not a valid git repository")]
    InvalidRepository { path: PathBuf },

    #[error("cannot list base directory {path}: {source}")]
    UnreadableBaseDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from external commands (git, bun, uv, bundle, ...)
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("could not start '{command}' in {dir}: {source}")]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed in {dir}: {stderr}")]
    Failed {
        command: String,
        dir: PathBuf,
        stderr: String,
    },
}

impl ManifestError {
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            path: path.into(),
            source,
        }
    }

    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::JsonParseError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::TomlParseError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_pattern(package: impl Into<String>, error: regex::Error) -> Self {
        Self::InvalidPattern {
            package: package.into(),
            message: error.to_string(),
        }
    }
}

impl RegistryError {
    pub fn package_not_found(package: &str, registry: &str) -> Self {
        Self::PackageNotFound {
            package: package.to_owned(),
            registry: registry.to_owned(),
        }
    }

    pub fn network_error(package: &str, registry: &str, message: impl ToString) -> Self {
        Self::NetworkError {
            package: package.to_owned(),
            registry: registry.to_owned(),
            message: message.to_string(),
        }
    }

    pub fn rate_limited(package: &str, registry: &str, retry_after: Option<Duration>) -> Self {
        Self::RateLimited {
            package: package.to_owned(),
            registry: registry.to_owned(),
            retry_after,
        }
    }

    pub fn invalid_response(package: &str, registry: &str, message: impl ToString) -> Self {
        Self::InvalidResponse {
            package: package.to_owned(),
            registry: registry.to_owned(),
            message: message.to_string(),
        }
    }

    pub fn timeout(package: &str, registry: &str) -> Self {
        Self::Timeout {
            package: package.to_owned(),
            registry: registry.to_owned(),
        }
    }

    /// True for HTTP 429 and for any error whose message mentions a rate limit
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
            || self.to_string().to_lowercase().contains("rate limit")
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}
