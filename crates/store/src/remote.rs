//! Remote document store over the backend's JSON document API.

use std::time::Duration;

use hydrasense_common::{AppError, AppResult, BackendConfig};
use serde::Deserialize;

use crate::documents::{Document, DocumentFilter, DocumentId, DocumentStore};

#[derive(Debug, Deserialize)]
struct AppendResponse {
    id: DocumentId,
}

#[derive(Debug, Deserialize)]
struct RemoteDocument {
    id: DocumentId,
    fields: Document,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    documents: Vec<RemoteDocument>,
}

/// Document store backed by the remote document API.
pub struct RestDocumentStore {
    client: reqwest::Client,
    base_url: url::Url,
}

impl RestDocumentStore {
    /// Create a new remote document store.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> AppResult<url::Url> {
        self.base_url
            .join(&format!("v1/collections/{collection}/documents"))
            .map_err(|e| AppError::Config(format!("Invalid backend URL: {e}")))
    }
}

#[async_trait::async_trait]
impl DocumentStore for RestDocumentStore {
    async fn append(&self, collection: &str, document: Document) -> AppResult<DocumentId> {
        let response = self
            .client
            .post(self.collection_url(collection)?)
            .json(&document)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Document append failed: {status}: {body}"
            )));
        }

        let payload: AppendResponse = response.json().await?;
        tracing::debug!(collection = %collection, document_id = %payload.id, "Appended document");
        Ok(payload.id)
    }

    async fn query_all(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<(DocumentId, Document)>> {
        let mut url = self.collection_url(collection)?;
        if let DocumentFilter::ByReporter(reporter_id) = filter {
            url.query_pairs_mut().append_pair("reporter", reporter_id);
        }

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Document query failed: {status}: {body}"
            )));
        }

        let payload: ListResponse = response.json().await?;
        Ok(payload
            .documents
            .into_iter()
            .map(|d| (d.id, d.fields))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> BackendConfig {
        BackendConfig {
            base_url: url::Url::parse("https://api.example.com/").unwrap(),
            reports_collection: "WaterSources".to_string(),
            history_collection: "ReportReviews".to_string(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_collection_url() {
        let store = RestDocumentStore::new(&test_config()).unwrap();
        let url = store.collection_url("WaterSources").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/collections/WaterSources/documents"
        );
    }
}
