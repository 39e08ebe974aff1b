//! # Object-store forwarder
//!
//! Uploads and deletes files through the backend's storage HTTP API. Object
//! names are generated from the upload timestamp plus the original
//! extension so repeated uploads never collide. Unlike the table forwarder,
//! every storage call checks the response status explicitly.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::config::StorageConfig;

use super::errors::{StorageError, StorageResult};

/// File operations against the storage API
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under a generated name in `bucket`; returns the public URL
    async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Remove an object by its stored name
    async fn delete(&self, bucket: &str, filename: &str) -> StorageResult<()>;
}

/// HTTP implementation of [`ObjectStore`]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(config: &StorageConfig, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn object_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, bucket, name)
    }

    fn public_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, bucket, name)
    }
}

/// Generated object name: upload timestamp in millis plus original extension
pub fn object_name(filename: &str) -> String {
    format!("{}{}", Utc::now().timestamp_millis(), extension(filename))
}

/// Extension including the dot, or empty when the name has none
fn extension(filename: &str) -> &str {
    filename.rfind('.').map_or("", |dot| &filename[dot..])
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let name = object_name(filename);
        let url = self.object_url(bucket, &name);
        tracing::debug!(original = filename, object = %name, url = %url, "uploading file");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        Ok(self.public_url(bucket, &name))
    }

    async fn delete(&self, bucket: &str, filename: &str) -> StorageResult<()> {
        let url = self.object_url(bucket, filename);
        tracing::debug!(url = %url, "deleting file");

        let response = self
            .http
            .delete(&url)
            .header("apikey", &self.service_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
