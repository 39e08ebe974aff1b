//! # CRUD Forwarder
//!
//! Issues GET/POST/PATCH/DELETE calls against the backend's per-table REST
//! endpoint, attaching the service credentials on every call. The
//! `TableBackend` trait is the seam the HTTP handlers and the update merger
//! work against; production uses [`RestBackend`], tests use
//! [`super::memory::InMemoryBackend`].

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;

use crate::config::BackendConfig;

use super::errors::{BackendError, BackendResult};

/// Collection CRUD against the backend's REST endpoint.
///
/// `query` and `filter` are pre-built wire strings (`select=*&id=eq.5`);
/// bodies are raw JSON text. Every operation returns the backend's response
/// bytes on success.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Read records matching a query string
    async fn select(&self, table: &str, query: &str) -> BackendResult<Vec<u8>>;

    /// Insert a record
    async fn insert(&self, table: &str, body: &str) -> BackendResult<Vec<u8>>;

    /// Partially replace records matching a filter
    async fn update(&self, table: &str, filter: &str, body: &str) -> BackendResult<Vec<u8>>;

    /// Delete records matching a filter
    async fn delete(&self, table: &str, filter: &str) -> BackendResult<Vec<u8>>;
}

/// HTTP implementation of [`TableBackend`]
pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    rest_path: String,
    service_key: String,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rest_path: config.rest_path.clone(),
            service_key: config.service_key.clone(),
        }
    }

    /// Build the per-table endpoint URL, appending the query when non-empty
    fn endpoint(&self, table: &str, query: &str) -> String {
        let mut url = format!("{}{}/{}", self.base_url, self.rest_path, table);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    async fn request(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> BackendResult<Vec<u8>> {
        tracing::debug!(method = %method, url = %url, "forwarding to backend");

        let mut request = self
            .http
            .request(method, url.as_str())
            .header("apikey", &self.service_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation");

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let data = response.bytes().await?.to_vec();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "backend reported an error");
            return Err(BackendError::Backend {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&data).into_owned(),
            });
        }

        Ok(data)
    }
}

#[async_trait]
impl TableBackend for RestBackend {
    async fn select(&self, table: &str, query: &str) -> BackendResult<Vec<u8>> {
        self.request(Method::GET, self.endpoint(table, query), None)
            .await
    }

    async fn insert(&self, table: &str, body: &str) -> BackendResult<Vec<u8>> {
        self.request(
            Method::POST,
            self.endpoint(table, ""),
            Some(body.to_string()),
        )
        .await
    }

    async fn update(&self, table: &str, filter: &str, body: &str) -> BackendResult<Vec<u8>> {
        self.request(
            Method::PATCH,
            self.endpoint(table, filter),
            Some(body.to_string()),
        )
        .await
    }

    async fn delete(&self, table: &str, filter: &str) -> BackendResult<Vec<u8>> {
        self.request(Method::DELETE, self.endpoint(table, filter), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new(&BackendConfig {
            base_url: "https://project.example.co/".to_string(),
            rest_path: "/rest/v1".to_string(),
            service_key: "secret".to_string(),
        })
    }

    #[test]
    fn test_endpoint_with_query() {
        let b = backend();
        assert_eq!(
            b.endpoint("user", "select=*&id=eq.5"),
            "https://project.example.co/rest/v1/user?select=*&id=eq.5"
        );
    }

    #[test]
    fn test_endpoint_without_query() {
        let b = backend();
        assert_eq!(
            b.endpoint("user", ""),
            "https://project.example.co/rest/v1/user"
        );
    }
}
