//! npm registry client
//!
//! Fetches package documents from an npm-compatible registry.
//! API endpoint: `{base}/{package}`, scoped names as `@scope%2Fname`.

use crate::config::DEFAULT_REGISTRY;
use crate::domain::RegistryPackageData;
use crate::error::RegistryError;
use crate::registry::{HttpClient, PackageRegistry};
use async_trait::async_trait;
use tracing::debug;

/// npm-compatible registry
pub struct NpmRegistry {
    client: HttpClient,
    base_url: String,
}

impl NpmRegistry {
    /// Create a client for the public npm registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_REGISTRY)
    }

    /// Create a client for a custom registry
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, encode_package_name(package))
    }
}

/// Encodes the scope separator of a scoped package name
fn encode_package_name(package: &str) -> String {
    if package.starts_with('@') {
        package.replacen('/', "%2F", 1)
    } else {
        package.to_string()
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    fn registry_name(&self) -> &str {
        "npm"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_package(&self, package: &str) -> Result<RegistryPackageData, RegistryError> {
        let url = self.build_url(package);
        debug!(%package, %url, "fetching registry document");
        self.client
            .get_json(&url, package, self.registry_name())
            .await
    }
}
