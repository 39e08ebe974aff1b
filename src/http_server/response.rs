//! # Response Envelope
//!
//! Every gateway reply is `{code, data, message}`. Successful table
//! responses flatten each record: document attributes are hoisted to the
//! top level next to the native `id`, so clients never see the nested
//! column. A document key literally named `id` is renamed `json.id` to keep
//! the native key unambiguous.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uniform response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// 200 on success, the error status otherwise
    pub code: u16,
    pub data: Value,
    pub message: String,
}

impl Envelope {
    /// Success envelope around raw backend bytes, flattening records
    pub fn success(payload: &[u8]) -> Self {
        Self {
            code: 200,
            data: flatten_records(payload),
            message: "success".to_string(),
        }
    }

    /// Success envelope around an already-shaped value
    pub fn ok(data: Value) -> Self {
        Self {
            code: 200,
            data,
            message: "success".to_string(),
        }
    }

    /// Error envelope with a null data field
    pub fn error(code: u16, message: String) -> Self {
        Self {
            code,
            data: Value::Null,
            message,
        }
    }
}

/// Flatten a backend record array; other payload shapes pass through.
///
/// Unparseable payloads are kept as a raw string so nothing the backend
/// said is dropped.
pub fn flatten_records(payload: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(payload) {
        Ok(Value::Array(items)) => {
            Value::Array(items.iter().map(flatten_record).collect())
        }
        Ok(other) => other,
        Err(_) => Value::String(String::from_utf8_lossy(payload).into_owned()),
    }
}

fn flatten_record(item: &Value) -> Value {
    let Value::Object(row) = item else {
        return item.clone();
    };

    let mut record = Map::new();

    if let Some(Value::Object(document)) = row.get("json") {
        for (key, value) in document {
            if key == "id" {
                record.insert("json.id".to_string(), value.clone());
            } else {
                record.insert(key.clone(), value.clone());
            }
        }
    }

    // Native key wins over any document field of the same name
    if let Some(id) = row.get("id") {
        record.insert("id".to_string(), id.clone());
    }

    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flatten_hoists_document_fields() {
        let payload = br#"[{"id": 1, "json": {"name": "Tom", "age": 30}}]"#;
        let data = flatten_records(payload);
        assert_eq!(data, json!([{"id": 1, "name": "Tom", "age": 30}]));
    }

    #[test]
    fn test_flatten_renames_document_id() {
        let payload = br#"[{"id": 1, "json": {"id": "doc-7", "name": "Tom"}}]"#;
        let data = flatten_records(payload);
        assert_eq!(data, json!([{"id": 1, "json.id": "doc-7", "name": "Tom"}]));
    }

    #[test]
    fn test_non_array_passes_through() {
        let payload = br#"{"message": "ok"}"#;
        assert_eq!(flatten_records(payload), json!({"message": "ok"}));
    }

    #[test]
    fn test_unparseable_kept_as_string() {
        assert_eq!(flatten_records(b"not json"), json!("not json"));
    }

    #[test]
    fn test_envelope_shapes() {
        let success = Envelope::success(br#"[]"#);
        assert_eq!(success.code, 200);
        assert_eq!(success.data, json!([]));
        assert_eq!(success.message, "success");

        let error = Envelope::error(404, "record not found".to_string());
        assert_eq!(error.code, 404);
        assert_eq!(error.data, Value::Null);
    }
}
