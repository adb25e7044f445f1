//! Registry access for fetching package metadata
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm-compatible registry client
//! - Concurrent fetcher with a bounded request window

mod client;
mod fetcher;
mod npm;

pub use client::HttpClient;
pub use fetcher::{FetchResult, RegistryFetcher};
pub use npm::NpmRegistry;

use crate::domain::RegistryPackageData;
use crate::error::RegistryError;
use async_trait::async_trait;

/// Trait for package registries
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Short registry name used in error messages
    fn registry_name(&self) -> &str;

    /// Base URL packages are resolved against
    fn base_url(&self) -> &str;

    /// Fetch the metadata document for a package
    async fn fetch_package(&self, package: &str) -> Result<RegistryPackageData, RegistryError>;
}
