//! Blob storage abstraction for photo uploads.
//!
//! Supports local filesystem storage (development) and HTTP
//! object storage (the hosted backend).

use std::path::PathBuf;

use crate::{AppError, AppResult};

/// Blob storage configuration.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Local filesystem storage.
    Local {
        /// Base path for stored blobs.
        base_path: PathBuf,
        /// Base URL for serving blobs.
        base_url: String,
    },
    /// HTTP object storage.
    Http {
        /// Upload endpoint URL.
        endpoint: String,
        /// Public URL prefix for serving blobs; falls back to the
        /// endpoint when absent.
        public_url: Option<String>,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Local {
            base_path: PathBuf::from("./blobs"),
            base_url: "/blobs".to_string(),
        }
    }
}

/// Uploaded blob metadata.
#[derive(Debug, Clone)]
pub struct UploadedBlob {
    /// Storage key (path or object key).
    pub key: String,
    /// Durable public URL for the blob.
    pub url: String,
    /// Blob size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// MD5 hash of the blob.
    pub md5: String,
}

/// Blob storage backend trait.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a blob and return its durable metadata.
    async fn upload(&self, key: &str, data: &[u8], content_type: &str)
    -> AppResult<UploadedBlob>;

    /// Delete a blob.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self { base_path, base_url }
    }
}

#[async_trait::async_trait]
impl BlobStore for LocalStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedBlob> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write blob: {e}")))?;

        let md5 = format!("{:x}", md5::compute(data));

        Ok(UploadedBlob {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to delete blob: {e}")))?;
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// HTTP object storage backend.
pub struct HttpStorage {
    client: reqwest::Client,
    endpoint: String,
    public_url: Option<String>,
}

impl HttpStorage {
    /// Create a new HTTP storage backend.
    #[must_use]
    pub fn new(endpoint: String, public_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            public_url,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), key)
    }
}

#[async_trait::async_trait]
impl BlobStore for HttpStorage {
    async fn upload(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedBlob> {
        let md5 = format!("{:x}", md5::compute(data));

        let response = self
            .client
            .put(self.object_url(key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Blob upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "Blob upload failed: status {}",
                response.status()
            )));
        }

        Ok(UploadedBlob {
            key: key.to_string(),
            url: self.public_url(key),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            md5,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.object_url(key))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Blob delete failed: {e}")))?;

        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::Storage(format!(
                "Blob delete failed: status {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => self.object_url(key),
        }
    }
}

/// Generate the storage key for a report photo.
///
/// Keys are timestamped JPEG paths under `images/`, matching the layout
/// existing documents reference.
#[must_use]
pub fn photo_storage_key(unix_millis: i64) -> String {
    format!("images/{unix_millis}.jpg")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_storage_key() {
        let key = photo_storage_key(1_700_000_000_000);
        assert_eq!(key, "images/1700000000000.jpg");
        assert!(key.starts_with("images/"));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_local_public_url_trims_slash() {
        let storage = LocalStorage::new(PathBuf::from("/tmp"), "http://localhost/blobs/".to_string());
        assert_eq!(
            storage.public_url("images/1.jpg"),
            "http://localhost/blobs/images/1.jpg"
        );
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let base = std::env::temp_dir().join(format!(
            "hydrasense-test-{}",
            crate::IdGenerator::new().generate()
        ));
        let storage = LocalStorage::new(base.clone(), "http://localhost/blobs".to_string());

        let blob = storage
            .upload("images/1700000000000.jpg", b"jpeg bytes", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(blob.size, 10);
        assert_eq!(blob.content_type, "image/jpeg");
        assert_eq!(blob.url, "http://localhost/blobs/images/1700000000000.jpg");

        let stored = tokio::fs::read(base.join("images/1700000000000.jpg"))
            .await
            .unwrap();
        assert_eq!(stored, b"jpeg bytes");

        storage.delete("images/1700000000000.jpg").await.unwrap();
        assert!(!base.join("images/1700000000000.jpg").exists());

        let _ = tokio::fs::remove_dir_all(base).await;
    }

    #[test]
    fn test_http_public_url_falls_back_to_endpoint() {
        let storage = HttpStorage::new("https://blobs.example.com/bucket".to_string(), None);
        assert_eq!(
            storage.public_url("images/1.jpg"),
            "https://blobs.example.com/bucket/images/1.jpg"
        );

        let storage = HttpStorage::new(
            "https://upload.example.com".to_string(),
            Some("https://cdn.example.com".to_string()),
        );
        assert_eq!(
            storage.public_url("images/1.jpg"),
            "https://cdn.example.com/images/1.jpg"
        );
    }
}
