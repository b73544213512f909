//! Local SQLite guidebook store
//!
//! Guidebooks are stored as JSON documents under an auto-increment integer
//! key; ids handed out are the decimal row id.

use super::GuidebookStore;
use crate::{Guidebook, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

/// Local database adapter
#[derive(Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Open (creating if needed) the database at `db_path`
    pub async fn open(db_path: &Path) -> Result<Self> {
        let newly_created = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        if newly_created {
            info!("Initialized new database: {}", db_path.display());
        } else {
            info!("Opened existing database: {}", db_path.display());
        }

        Self::from_pool(pool).await
    }

    /// Private in-memory database (single connection so every query sees it)
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        // Idempotent - safe to call on every startup
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guidebooks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl GuidebookStore for LocalStore {
    async fn write(&self, guidebook: &Guidebook) -> Result<String> {
        let document = serde_json::to_string(&guidebook.as_document())?;
        let row_id = sqlx::query("INSERT INTO guidebooks (document, created_at) VALUES (?, ?)")
            .bind(document)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        debug!("Wrote guidebook to local store with id {}", row_id);
        Ok(row_id.to_string())
    }

    async fn read(&self, id: &str) -> Result<Option<Guidebook>> {
        // Keys are integers; anything else cannot name a document
        let Ok(row_id) = id.trim().parse::<i64>() else {
            return Ok(None);
        };

        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM guidebooks WHERE id = ?")
                .bind(row_id)
                .fetch_optional(&self.pool)
                .await?;

        document
            .map(|doc| {
                serde_json::from_str::<Guidebook>(&doc)
                    .map(|guidebook| guidebook.with_id(row_id.to_string()))
                    .map_err(Into::into)
            })
            .transpose()
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Destination;
    use tempfile::TempDir;

    fn sample() -> Guidebook {
        Guidebook {
            id: Some("ignored".to_string()),
            title: "Harbour walk".to_string(),
            description: "Along the water".to_string(),
            destinations: vec![
                Destination::new("", "Meet at the pier"),
                Destination::new("https://example.org/lighthouse", "Lighthouse"),
            ],
        }
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = LocalStore::in_memory().await.unwrap();
        let id = store.write(&sample()).await.unwrap();
        assert_eq!(id, "1");

        let loaded = store.read(&id).await.unwrap().unwrap();
        assert_eq!(loaded.id.as_deref(), Some("1"));
        assert_eq!(loaded.destinations, sample().destinations);
    }

    #[tokio::test]
    async fn test_ids_increment() {
        let store = LocalStore::in_memory().await.unwrap();
        assert_eq!(store.write(&sample()).await.unwrap(), "1");
        assert_eq!(store.write(&sample()).await.unwrap(), "2");
    }

    #[tokio::test]
    async fn test_missing_and_non_numeric_ids_read_as_none() {
        let store = LocalStore::in_memory().await.unwrap();
        assert!(store.read("7").await.unwrap().is_none());
        assert!(store.read("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("paseos.db");

        let id = {
            let store = LocalStore::open(&path).await.unwrap();
            store.write(&sample()).await.unwrap()
        };

        let reopened = LocalStore::open(&path).await.unwrap();
        let loaded = reopened.read(&id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Harbour walk");
    }
}
