//! Guidebook persistence
//!
//! Two interchangeable adapters implement [`GuidebookStore`]: a local SQLite
//! database and a remote document store reached over HTTP. An in-memory
//! store backs tests and ephemeral deployments.

mod local;
mod memory;
mod remote;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::{Guidebook, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Guidebook persistence contract
#[async_trait]
pub trait GuidebookStore: Send + Sync {
    /// Persist a guidebook as a new document and return its id
    async fn write(&self, guidebook: &Guidebook) -> Result<String>;

    /// Load a guidebook by id; `Ok(None)` when no document exists
    ///
    /// The returned guidebook carries `id`.
    async fn read(&self, id: &str) -> Result<Option<Guidebook>>;

    /// Adapter name for logging
    fn name(&self) -> &'static str;
}

/// Open the configured store adapter
///
/// A remote backend without `remote_url` falls back to the local database.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn GuidebookStore>> {
    let store: Arc<dyn GuidebookStore> = match config.backend {
        StoreBackend::Remote => {
            match config.remote_url.as_deref().filter(|url| !url.trim().is_empty()) {
                Some(url) => Arc::new(RemoteStore::new(url, &config.collection)?),
                None => {
                    warn!("Remote store selected without remote_url; falling back to local store");
                    Arc::new(LocalStore::open(&config.database_path).await?)
                }
            }
        }
        StoreBackend::Local => Arc::new(LocalStore::open(&config.database_path).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!("Guidebook store: {}", store.name());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_remote_without_url_falls_back_to_local() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Remote,
            database_path: dir.path().join("paseos.db"),
            remote_url: None,
            ..StoreConfig::default()
        };
        let store = open(&config).await.unwrap();
        assert_eq!(store.name(), "local");
        assert!(dir.path().join("paseos.db").exists());
    }

    #[tokio::test]
    async fn test_open_remote_with_url() {
        let config = StoreConfig {
            backend: StoreBackend::Remote,
            remote_url: Some("http://127.0.0.1:9".to_string()),
            ..StoreConfig::default()
        };
        let store = open(&config).await.unwrap();
        assert_eq!(store.name(), "remote");
    }

    #[tokio::test]
    async fn test_open_memory() {
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        };
        assert_eq!(open(&config).await.unwrap().name(), "memory");
    }
}
