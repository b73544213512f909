//! In-memory guidebook store

use super::GuidebookStore;
use crate::{Guidebook, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Guidebooks held in process memory, keyed by UUID
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Guidebook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl GuidebookStore for MemoryStore {
    async fn write(&self, guidebook: &Guidebook) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.documents
            .write()
            .await
            .insert(id.clone(), guidebook.as_document());
        debug!("Wrote guidebook {} to memory", id);
        Ok(id)
    }

    async fn read(&self, id: &str) -> Result<Option<Guidebook>> {
        Ok(self
            .documents
            .read()
            .await
            .get(id)
            .cloned()
            .map(|doc| doc.with_id(id)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
