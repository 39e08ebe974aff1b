//! # File Routes
//!
//! Multipart upload and deletion forwarded to the object store. The bucket
//! comes from the `bucket` query parameter, falling back to the configured
//! default.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde_json::json;

use super::errors::{ApiError, ApiResult};
use super::response::Envelope;
use super::server::AppState;

fn bucket_from(params: &BTreeMap<String, String>, state: &AppState) -> String {
    params
        .get("bucket")
        .cloned()
        .unwrap_or_else(|| state.default_bucket.clone())
}

/// POST /api/file/upload — multipart form with a `file` field
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BTreeMap<String, String>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Envelope>> {
    let bucket = bucket_from(&params, &state);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Parse(format!("failed to parse form: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Parse(format!("failed to read file: {}", e)))?;

        tracing::info!(bucket = %bucket, filename = %filename, size = data.len(), "uploading");
        let url = state
            .store
            .upload(&bucket, &filename, &content_type, data.to_vec())
            .await?;

        return Ok(Json(Envelope::ok(json!({ "url": url }))));
    }

    Err(ApiError::MissingParam("file field in multipart form"))
}

/// POST /api/file/delete?filename=xxx
pub async fn delete_file_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> ApiResult<Json<Envelope>> {
    let bucket = bucket_from(&params, &state);
    let filename = params
        .get("filename")
        .filter(|f| !f.is_empty())
        .ok_or(ApiError::MissingParam("filename parameter"))?;

    state.store.delete(&bucket, filename).await?;

    Ok(Json(Envelope::ok(json!({ "message": "file deleted" }))))
}
