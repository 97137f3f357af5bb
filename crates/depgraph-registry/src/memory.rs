use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::client::RegistrySource;
use crate::metadata::PackageMetadata;
use depgraph_error::{DepgraphError, Result};

/// Registry backed by documents held in memory. Used for offline analysis
/// from a snapshot file and as a fixture in tests.
#[derive(Default)]
pub struct InMemoryRegistry {
    packages: HashMap<String, PackageMetadata>,
    statuses: HashMap<String, u16>,
    fetches: AtomicUsize,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_package(mut self, metadata: PackageMetadata) -> Self {
        self.packages.insert(metadata.name.clone(), metadata);
        self
    }

    /// Makes lookups of `name` fail with the given HTTP status.
    #[must_use]
    pub fn with_status(mut self, name: &str, status: u16) -> Self {
        self.statuses.insert(name.to_string(), status);
        self
    }

    /// Loads a JSON object mapping package names to registry documents.
    pub fn from_snapshot_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| DepgraphError::IoError(format!("{}: {e}", path.display())))?;
        Self::from_snapshot_str(&content)
    }

    pub fn from_snapshot_str(content: &str) -> Result<Self> {
        let documents: HashMap<String, PackageMetadata> =
            serde_json::from_str(content).map_err(|e| DepgraphError::MalformedMetadata {
                name: "(snapshot)".to_string(),
                message: e.to_string(),
            })?;

        // Lookups go by the snapshot key, even when the document names itself differently.
        let mut registry = Self::new();
        for (name, mut metadata) in documents {
            if metadata.name.is_empty() {
                metadata.name.clone_from(&name);
            }
            registry.packages.insert(name, metadata);
        }
        Ok(registry)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegistrySource for InMemoryRegistry {
    async fn fetch_metadata(&self, name: &str) -> Result<PackageMetadata> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.statuses.get(name) {
            return Err(DepgraphError::RegistryStatus {
                name: name.to_string(),
                status: *status,
            });
        }

        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| DepgraphError::RegistryStatus {
                name: name.to_string(),
                status: 404,
            })
    }
}
