//! # HTTP Server
//!
//! Builds the axum router from an immutable [`AppConfig`] and the two
//! outbound collaborators (table backend, object store), then serves it.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::{RestBackend, TableBackend};
use crate::config::AppConfig;
use crate::filter::FilterBuilder;
use crate::storage::{ObjectStore, StorageClient};

use super::db_routes::db_handler;
use super::file_routes::{delete_file_handler, upload_handler};
use super::response::Envelope;

/// State shared by every handler; read-only after startup
pub struct AppState {
    pub backend: Arc<dyn TableBackend>,
    pub store: Arc<dyn ObjectStore>,
    pub filter: FilterBuilder,
    pub tables: HashSet<String>,
    pub default_bucket: String,
}

/// Gateway HTTP server
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    /// Create a server with production collaborators built from config
    pub fn new(config: &AppConfig) -> Self {
        let backend = Arc::new(RestBackend::new(&config.backend));
        let store = Arc::new(StorageClient::new(
            &config.storage,
            &config.backend.service_key,
        ));
        Self::with_components(config, backend, store)
    }

    /// Create a server with injected collaborators (used by tests)
    pub fn with_components(
        config: &AppConfig,
        backend: Arc<dyn TableBackend>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let state = Arc::new(AppState {
            backend,
            store,
            filter: FilterBuilder::new(),
            tables: config.tables.iter().cloned().collect(),
            default_bucket: config.storage.default_bucket.clone(),
        });

        Self {
            addr: config.server.socket_addr(),
            router: Self::build_router(state, &config.server.cors_origins),
        }
    }

    fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
        let cors = if cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/api/db/{action}/{table}", any(db_handler))
            .route("/api/file/upload", post(upload_handler))
            .route("/api/file/delete", post(delete_file_handler))
            .with_state(state)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until shutdown
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .addr
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        tracing::info!(%addr, "starting tablegate");
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await
    }
}

async fn health_handler() -> Json<Envelope> {
    Json(Envelope::ok(json!({ "status": "healthy" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::storage::StorageResult;
    use async_trait::async_trait;

    struct NullStore;

    #[async_trait]
    impl ObjectStore for NullStore {
        async fn upload(
            &self,
            bucket: &str,
            _filename: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> StorageResult<String> {
            Ok(format!("mem://{}/object", bucket))
        }

        async fn delete(&self, _bucket: &str, _filename: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_router_builds() {
        let config = AppConfig::default();
        let server = HttpServer::with_components(
            &config,
            Arc::new(InMemoryBackend::new()),
            Arc::new(NullStore),
        );
        let _router = server.router();
    }

    #[test]
    fn test_addr_from_config() {
        let config = AppConfig::default();
        let server = HttpServer::with_components(
            &config,
            Arc::new(InMemoryBackend::new()),
            Arc::new(NullStore),
        );
        assert_eq!(server.addr, "0.0.0.0:8700");
    }
}
