//! # Update Merger
//!
//! The backend's update verb fully replaces the document column, so a bare
//! PATCH with `{"name": "x"}` would drop every other attribute. This module
//! implements patch semantics on top of replace semantics: read the current
//! document, shallow-merge the caller's fields over it, and hand back the
//! merged body for the subsequent update call.

use serde_json::{Map, Value};

use super::client::TableBackend;
use super::errors::{BackendError, BackendResult};

/// Resolve the effective update body for `table` rows matching `filter`.
///
/// Fails with [`BackendError::NotFound`] when the filter selects zero
/// records (no update call must follow), and with [`BackendError::Parse`]
/// when either the stored payload or `new_body` is not valid JSON. Keys in
/// `new_body` overwrite the original document; untouched keys survive.
pub async fn merge_update<B: TableBackend + ?Sized>(
    backend: &B,
    table: &str,
    filter: &str,
    new_body: &str,
) -> BackendResult<String> {
    // Restrict the read to the document column
    let query = format!("select=json&{}", filter);
    let data = backend.select(table, &query).await?;

    let records: Vec<Map<String, Value>> = serde_json::from_slice(&data)
        .map_err(|e| BackendError::Parse(format!("original data: {}", e)))?;

    if records.is_empty() {
        return Err(BackendError::NotFound);
    }
    if records.len() > 1 {
        // One merge basis applies to every matched record; surface it
        tracing::warn!(
            table,
            matches = records.len(),
            "merge base taken from the first of multiple matched records"
        );
    }

    // Missing or non-object documents merge from scratch
    let mut document = match records[0].get("json") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let new_fields: Map<String, Value> = serde_json::from_str(new_body)
        .map_err(|e| BackendError::Parse(format!("new data: {}", e)))?;

    for (key, value) in new_fields {
        document.insert(key, value);
    }

    let merged = serde_json::to_string(&Value::Object(document))
        .map_err(|e| BackendError::Parse(format!("merged data: {}", e)))?;

    Ok(format!("{{\"json\":{}}}", merged))
}
