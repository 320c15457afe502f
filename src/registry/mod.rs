//! Registry adapters for fetching the latest published version
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter
//! - PyPI JSON API adapter
//! - RubyGems API adapter
//! - Batch coordinator (dedup, batching, broadcast)

mod batch;
mod client;
mod npm;
mod pypi;
mod rubygems;

pub use batch::{unique_count, BatchCoordinator, BatchOutcome, Resolution};
pub use client::{HttpClient, RetryPolicy, REQUEST_TIMEOUT};
pub use npm::NpmAdapter;
pub use pypi::PyPIAdapter;
pub use rubygems::RubyGemsAdapter;

use crate::domain::Manager;
use crate::error::RegistryError;
use async_trait::async_trait;
use reqwest::Url;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the manager this adapter resolves
    fn manager(&self) -> Manager;

    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the latest published version of a package
    async fn fetch_latest(&self, package: &str) -> Result<String, RegistryError>;
}

/// Create a registry adapter for the given manager
pub fn create_adapter(manager: Manager, client: HttpClient) -> Box<dyn RegistryAdapter> {
    match manager {
        Manager::Npm => Box::new(NpmAdapter::new(client)),
        Manager::Pypi => Box::new(PyPIAdapter::new(client)),
        Manager::Rubygems => Box::new(RubyGemsAdapter::new(client)),
    }
}

/// Appends path segments to `base`, percent-encoding each one (`/` becomes `%2F`)
pub(crate) fn build_url(
    base: &str,
    segments: &[&str],
    package: &str,
    registry: &str,
) -> Result<Url, RegistryError> {
    let invalid = || {
        RegistryError::invalid_response(package, registry, format!("invalid registry URL {base}"))
    };
    let mut url = Url::parse(base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
