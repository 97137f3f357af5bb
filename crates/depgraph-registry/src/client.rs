use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::http::HttpRegistry;
use crate::metadata::PackageMetadata;
use depgraph_error::Result;

/// Anything that can answer "what has been published for this package".
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch_metadata(&self, name: &str) -> Result<PackageMetadata>;
}

/// Memoizing front for a [`RegistrySource`].
///
/// Entries are keyed by package name only and never invalidated, so a
/// version published after the first lookup stays invisible for the
/// lifetime of the client. Cloning shares both the source and the cache;
/// construct a fresh client to get a fresh cache.
#[derive(Clone)]
pub struct RegistryClient {
    source: Arc<dyn RegistrySource>,
    cache: Arc<Mutex<HashMap<String, Arc<PackageMetadata>>>>,
}

impl RegistryClient {
    pub fn new<S: RegistrySource + 'static>(source: S) -> Self {
        Self::from_shared(Arc::new(source))
    }

    #[must_use]
    pub fn from_shared(source: Arc<dyn RegistrySource>) -> Self {
        Self {
            source,
            cache: Arc::new(Mutex::new(HashMap::with_capacity(512))),
        }
    }

    pub fn http(base_url: &str) -> Result<Self> {
        Ok(Self::new(HttpRegistry::new(base_url)?))
    }

    pub async fn get_metadata(&self, name: &str) -> Result<Arc<PackageMetadata>> {
        {
            let cache = self.cache.lock().await;
            if let Some(cached_info) = cache.get(name) {
                return Ok(Arc::clone(cached_info));
            }
        }

        // The lock is not held across the fetch; two concurrent first lookups
        // of one name may both hit the source and the later insert wins.
        let metadata = Arc::new(self.source.fetch_metadata(name).await?);

        {
            let mut cache = self.cache.lock().await;
            cache.insert(name.to_string(), Arc::clone(&metadata));
        }

        Ok(metadata)
    }

    pub async fn cached_packages(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRegistry;
    use crate::metadata::VersionManifest;
    use depgraph_error::DepgraphError;

    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::new().with_package(
            PackageMetadata::new("react")
                .with_version("19.2.0", VersionManifest::default())
                .with_latest("19.2.0"),
        )
    }

    #[tokio::test]
    async fn test_metadata_is_memoized_by_name() {
        let source = Arc::new(registry());
        let client = RegistryClient::from_shared(Arc::<InMemoryRegistry>::clone(&source));

        let first = client.get_metadata("react").await.unwrap();
        let second = client.get_metadata("react").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(client.cached_packages().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_the_cache() {
        let source = Arc::new(registry());
        let client = RegistryClient::from_shared(Arc::<InMemoryRegistry>::clone(&source));
        let shared = client.clone();

        client.get_metadata("react").await.unwrap();
        shared.get_metadata("react").await.unwrap();
        assert_eq!(source.fetch_count(), 1);

        let fresh = RegistryClient::from_shared(Arc::<InMemoryRegistry>::clone(&source));
        fresh.get_metadata("react").await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = Arc::new(registry());
        let client = RegistryClient::from_shared(Arc::<InMemoryRegistry>::clone(&source));

        let err = client.get_metadata("missing").await.unwrap_err();
        assert_eq!(
            err,
            DepgraphError::RegistryStatus {
                name: "missing".to_string(),
                status: 404
            }
        );
        let _ = client.get_metadata("missing").await;
        assert_eq!(source.fetch_count(), 2);
        assert_eq!(client.cached_packages().await, 0);
    }
}
