//! # Table CRUD Routes
//!
//! One dispatch point for `/api/db/{action}/{table}`: the action segment
//! selects the backend operation, the query string becomes the filter, and
//! the body rides along for insert/update. The table must be in the
//! allowed-table registry before anything is forwarded.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use crate::backend::merge_update;

use super::errors::{ApiError, ApiResult};
use super::response::Envelope;
use super::server::AppState;

/// Wrap a raw insert/update body into the document column shape
fn wrap_document_body(body: &str) -> String {
    format!("{{\"json\":{}}}", body)
}

pub async fn db_handler(
    State(state): State<Arc<AppState>>,
    Path((action, table)): Path<(String, String)>,
    Query(params): Query<BTreeMap<String, String>>,
    body: String,
) -> ApiResult<Json<Envelope>> {
    if !state.tables.contains(&table) {
        return Err(ApiError::TableNotAllowed(table));
    }

    let filter = state.filter.build(&params);
    tracing::debug!(action = %action, table = %table, filter = %filter, "dispatching");

    let data = match action.as_str() {
        "get" => {
            let mut query = String::from("select=*");
            if !filter.is_empty() {
                query.push('&');
                query.push_str(&filter);
            }
            state.backend.select(&table, &query).await?
        }
        "insert" => {
            if body.is_empty() {
                return Err(ApiError::MissingParam("body"));
            }
            state
                .backend
                .insert(&table, &wrap_document_body(&body))
                .await?
        }
        "update" => {
            if filter.is_empty() {
                return Err(ApiError::MissingParam("filter (id or json.field)"));
            }
            if body.is_empty() {
                return Err(ApiError::MissingParam("body"));
            }
            let merged = merge_update(state.backend.as_ref(), &table, &filter, &body).await?;
            state.backend.update(&table, &filter, &merged).await?
        }
        "delete" => {
            if filter.is_empty() {
                return Err(ApiError::MissingParam("filter (id or json.field)"));
            }
            state.backend.delete(&table, &filter).await?
        }
        other => return Err(ApiError::InvalidAction(other.to_string())),
    };

    Ok(Json(Envelope::success(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_document_body() {
        assert_eq!(
            wrap_document_body(r#"{"name":"Tom"}"#),
            r#"{"json":{"name":"Tom"}}"#
        );
    }
}
