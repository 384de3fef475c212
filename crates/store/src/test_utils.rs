//! In-memory collaborator fakes for tests.
//!
//! Every remote seam has a fake here so services can be exercised
//! without a network: a document store with scriptable append failures,
//! blob stores that record or refuse uploads, and a static auth gateway.

use std::collections::HashMap;
use std::sync::Mutex;

use hydrasense_common::{AppError, AppResult, BlobStore, IdGenerator, UploadedBlob};

use crate::auth::{AuthGateway, Credentials, Session};
use crate::documents::{Document, DocumentFilter, DocumentId, DocumentStore};

fn locked<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// In-memory document store.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<(DocumentId, Document)>>>,
    failing_appends: Mutex<u32>,
    id_gen: IdGenerator,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection with documents, returning their assigned ids.
    pub fn seed(&self, collection: &str, documents: Vec<Document>) -> Vec<DocumentId> {
        let mut collections = locked(&self.collections);
        let entries = collections.entry(collection.to_string()).or_default();
        documents
            .into_iter()
            .map(|document| {
                let id = self.id_gen.generate();
                entries.push((id.clone(), document));
                id
            })
            .collect()
    }

    /// Make the next `count` appends fail with a transport error.
    pub fn fail_next_appends(&self, count: u32) {
        *locked(&self.failing_appends) = count;
    }

    /// Snapshot of a collection in arrival order.
    #[must_use]
    pub fn documents(&self, collection: &str) -> Vec<(DocumentId, Document)> {
        locked(&self.collections)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn append(&self, collection: &str, document: Document) -> AppResult<DocumentId> {
        {
            let mut failing = locked(&self.failing_appends);
            if *failing > 0 {
                *failing -= 1;
                return Err(AppError::ExternalService(
                    "Document append refused".to_string(),
                ));
            }
        }

        let id = self.id_gen.generate();
        locked(&self.collections)
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), document));
        Ok(id)
    }

    async fn query_all(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> AppResult<Vec<(DocumentId, Document)>> {
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|(_, document)| filter.matches(document))
            .collect())
    }
}

/// In-memory blob store recording every upload.
pub struct InMemoryBlobStore {
    uploads: Mutex<Vec<UploadedBlob>>,
    base_url: String,
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            base_url: "https://blobs.test".to_string(),
        }
    }
}

impl InMemoryBlobStore {
    /// Create an empty blob store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every blob uploaded so far, in upload order.
    #[must_use]
    pub fn uploads(&self) -> Vec<UploadedBlob> {
        locked(&self.uploads).clone()
    }
}

#[async_trait::async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedBlob> {
        let blob = UploadedBlob {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5: format!("{:x}", md5::compute(data)),
        };
        locked(&self.uploads).push(blob.clone());
        Ok(blob)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        locked(&self.uploads).retain(|blob| blob.key != key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

/// Blob store that refuses every upload.
pub struct FailingBlobStore {
    message: String,
}

impl FailingBlobStore {
    /// Create a blob store failing with the given message.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl BlobStore for FailingBlobStore {
    async fn upload(
        &self,
        _key: &str,
        _data: &[u8],
        _content_type: &str,
    ) -> AppResult<UploadedBlob> {
        Err(AppError::Storage(self.message.clone()))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(AppError::Storage(self.message.clone()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://blobs.test/{key}")
    }
}

/// Auth gateway with a fixed starting session.
pub struct StaticAuth {
    current: Mutex<Option<String>>,
    id_gen: IdGenerator,
}

impl StaticAuth {
    /// Gateway with no session; reporter resolution falls back to
    /// `"anonymous"`.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            current: Mutex::new(None),
            id_gen: IdGenerator::new(),
        }
    }

    /// Gateway with an existing session for `user_id`.
    #[must_use]
    pub fn signed_in(user_id: &str) -> Self {
        Self {
            current: Mutex::new(Some(user_id.to_string())),
            id_gen: IdGenerator::new(),
        }
    }
}

#[async_trait::async_trait]
impl AuthGateway for StaticAuth {
    async fn current_user_id(&self) -> Option<String> {
        locked(&self.current).clone()
    }

    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
        let session = Session {
            user_id: credentials.email.clone(),
            token: self.id_gen.generate_token(),
        };
        *locked(&self.current) = Some(session.user_id.clone());
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<Session> {
        self.sign_in(credentials).await
    }

    async fn sign_out(&self) {
        *locked(&self.current) = None;
    }
}
