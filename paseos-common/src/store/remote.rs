//! Remote document store adapter
//!
//! Talks to a JSON document store over HTTP:
//! - `POST {base}/{collection}` with the guidebook body, answering `{ "id": ... }`
//! - `GET {base}/{collection}/{id}`, answering the document or 404

use super::GuidebookStore;
use crate::{Error, Guidebook, Result};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct WriteResponse {
    id: String,
}

/// Remote document-store adapter
#[derive(Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    collection_url: Url,
}

impl RemoteStore {
    pub fn new(base_url: &str, collection: &str) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), base_url, collection)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, collection: &str) -> Result<Self> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            collection.trim_matches('/')
        );
        let collection_url = Url::parse(&raw)
            .map_err(|e| Error::Config(format!("Invalid remote store URL {}: {}", raw, e)))?;
        if collection_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Remote store URL cannot be a base: {}", raw)));
        }
        Ok(Self {
            client,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn document_url(&self, id: &str) -> Url {
        let mut url = self.collection_url.clone();
        // checked in constructor
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }
}

#[async_trait]
impl GuidebookStore for RemoteStore {
    async fn write(&self, guidebook: &Guidebook) -> Result<String> {
        debug!("Writing guidebook to {}", self.collection_url);
        let response = self
            .client
            .post(self.collection_url.clone())
            .json(&guidebook.as_document())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Store(format!("write rejected with status {}", status)));
        }

        let WriteResponse { id } = response.json().await?;
        Ok(id)
    }

    async fn read(&self, id: &str) -> Result<Option<Guidebook>> {
        let response = self.client.get(self.document_url(id)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                warn!("No such journey: {}", id);
                Ok(None)
            }
            status if status.is_success() => {
                let guidebook: Guidebook = response.json().await?;
                Ok(Some(guidebook.with_id(id)))
            }
            status => Err(Error::Store(format!("read of {} failed with status {}", id, status))),
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_joining() {
        let store = RemoteStore::new("http://docs.local/", "/api/guidebooks/").unwrap();
        assert_eq!(store.collection_url().as_str(), "http://docs.local/api/guidebooks");
        assert_eq!(
            store.document_url("a b").as_str(),
            "http://docs.local/api/guidebooks/a%20b"
        );
    }

    #[test]
    fn test_invalid_base_is_config_error() {
        assert!(matches!(
            RemoteStore::new("not a url", "guidebooks"),
            Err(Error::Config(_))
        ));
    }
}
