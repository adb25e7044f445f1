//! Concurrent registry fetcher
//!
//! Fetches one document per distinct package name while keeping at most
//! `concurrency` requests in flight. Results come back in input order.

use super::PackageRegistry;
use crate::domain::RegistryPackageData;
use crate::error::RegistryError;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Outcome of one package fetch
pub type FetchResult = Result<Arc<RegistryPackageData>, RegistryError>;

/// Bounded-concurrency fetcher over a registry
pub struct RegistryFetcher<R> {
    registry: Arc<R>,
    semaphore: Arc<Semaphore>,
}

impl<R: PackageRegistry> RegistryFetcher<R> {
    /// Create a fetcher with a request window of `concurrency`
    pub fn new(registry: R, concurrency: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Fetch every package, returning results in the order of `names`
    pub async fn fetch_all(&self, names: &[&str]) -> Vec<FetchResult> {
        self.fetch_all_with(names, |_| {}).await
    }

    /// Like [`fetch_all`](Self::fetch_all), calling `on_done` as each distinct
    /// package settles
    pub async fn fetch_all_with<F>(&self, names: &[&str], on_done: F) -> Vec<FetchResult>
    where
        F: Fn(&str) + Sync,
    {
        let mut distinct: Vec<&str> = Vec::new();
        for &name in names {
            if !distinct.contains(&name) {
                distinct.push(name);
            }
        }

        debug!(
            requested = names.len(),
            distinct = distinct.len(),
            "fetching registry documents"
        );

        let on_done = &on_done;
        let fetches = distinct.iter().map(|&name| async move {
            let result = self.fetch_one(name).await;
            on_done(name);
            (name, result)
        });
        let settled: HashMap<&str, FetchResult> = join_all(fetches).await.into_iter().collect();

        names
            .iter()
            .map(|name| match settled.get(name) {
                Some(result) => result.clone(),
                None => Err(RegistryError::invalid_response(
                    *name,
                    self.registry.registry_name(),
                    "no fetch was issued",
                )),
            })
            .collect()
    }

    async fn fetch_one(&self, name: &str) -> FetchResult {
        let _permit = self.semaphore.acquire().await.map_err(|e| {
            RegistryError::network_error(name, self.registry.registry_name(), e.to_string())
        })?;

        match self.registry.fetch_package(name).await {
            Ok(data) => Ok(Arc::new(data)),
            Err(error) => {
                debug!(package = %name, %error, "registry fetch failed");
                Err(error)
            }
        }
    }
}
