//! In-memory [`TableBackend`] for testing
//!
//! Understands the subset of the wire format the gateway emits: a
//! `select=json|*` projection plus `field=op.value` clauses on the native
//! `id` column or `json->>field` document fields. In production the gateway
//! talks to the hosted backend; tests swap this in to exercise the full
//! request path without a network.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use serde_json::{json, Map, Value};

use crate::filter::FilterOperator;

use super::client::TableBackend;
use super::errors::{BackendError, BackendResult};

/// One parsed wire clause
#[derive(Debug)]
struct WireClause {
    field: String,
    document: bool,
    operator: FilterOperator,
    value: String,
}

impl WireClause {
    fn parse(key: &str, raw: &str) -> Option<Self> {
        let (document, field) = match key.strip_prefix("json->>") {
            Some(field) => (true, field),
            None => (false, key),
        };

        let (operator, value) = match raw.split_once('.') {
            Some((token, rest)) => match FilterOperator::from_token(token) {
                Some(op) => (op, rest),
                None => (FilterOperator::Eq, raw),
            },
            None => (FilterOperator::Eq, raw),
        };

        Some(Self {
            field: field.to_string(),
            document,
            operator,
            value: percent_decode_str(value).decode_utf8_lossy().into_owned(),
        })
    }

    fn matches(&self, record: &Value) -> bool {
        let target = if self.document {
            record.get("json").and_then(|doc| doc.get(&self.field))
        } else {
            record.get(&self.field)
        };
        let Some(target) = target else {
            return false;
        };

        let actual = stringify(target);
        match self.operator {
            FilterOperator::Eq => actual == self.value,
            FilterOperator::Neq => actual != self.value,
            FilterOperator::Gt => compare(&actual, &self.value) == Ordering::Greater,
            FilterOperator::Gte => compare(&actual, &self.value) != Ordering::Less,
            FilterOperator::Lt => compare(&actual, &self.value) == Ordering::Less,
            FilterOperator::Lte => compare(&actual, &self.value) != Ordering::Greater,
            FilterOperator::Like => like_match(&actual, &self.value),
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric comparison when both sides parse, string comparison otherwise
fn compare(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// SQL LIKE matching with `%` as any-sequence and `_` as single char
fn like_match(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    like_match_at(&value, &pattern)
}

fn like_match_at(value: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => value.is_empty(),
        Some((&'%', rest)) => {
            (0..=value.len()).any(|skip| like_match_at(&value[skip..], rest))
        }
        Some((&'_', rest)) => match value.split_first() {
            Some((_, value_rest)) => like_match_at(value_rest, rest),
            None => false,
        },
        Some((c, rest)) => match value.split_first() {
            Some((v, value_rest)) if v == c => like_match_at(value_rest, rest),
            _ => false,
        },
    }
}

/// What a query projects per record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    All,
    Document,
}

fn parse_query(query: &str) -> (Projection, Vec<WireClause>) {
    let mut projection = Projection::All;
    let mut clauses = Vec::new();

    for part in query.split('&').filter(|p| !p.is_empty()) {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        if key == "select" {
            if value == "json" {
                projection = Projection::Document;
            }
            continue;
        }
        if let Some(clause) = WireClause::parse(key, value) {
            clauses.push(clause);
        }
    }

    (projection, clauses)
}

/// In-memory table store keyed by table name
#[derive(Default)]
pub struct InMemoryBackend {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err() -> BackendError {
        BackendError::Parse("store lock poisoned".to_string())
    }
}

#[async_trait]
impl TableBackend for InMemoryBackend {
    async fn select(&self, table: &str, query: &str) -> BackendResult<Vec<u8>> {
        let (projection, clauses) = parse_query(query);
        let tables = self.tables.read().map_err(|_| Self::lock_err())?;
        let empty = Vec::new();
        let records = tables.get(table).unwrap_or(&empty);

        let selected: Vec<Value> = records
            .iter()
            .filter(|r| clauses.iter().all(|c| c.matches(r)))
            .map(|r| match projection {
                Projection::All => r.clone(),
                Projection::Document => {
                    json!({ "json": r.get("json").cloned().unwrap_or(Value::Null) })
                }
            })
            .collect();

        serde_json::to_vec(&selected).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn insert(&self, table: &str, body: &str) -> BackendResult<Vec<u8>> {
        let row: Map<String, Value> =
            serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;

        let mut tables = self.tables.write().map_err(|_| Self::lock_err())?;
        let records = tables.entry(table.to_string()).or_default();

        let next_id = records
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1;

        let mut record = Map::new();
        record.insert("id".to_string(), json!(next_id));
        for (key, value) in row {
            record.insert(key, value);
        }
        let record = Value::Object(record);
        records.push(record.clone());

        serde_json::to_vec(&vec![record]).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn update(&self, table: &str, filter: &str, body: &str) -> BackendResult<Vec<u8>> {
        let patch: Map<String, Value> =
            serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
        let (_, clauses) = parse_query(filter);

        let mut tables = self.tables.write().map_err(|_| Self::lock_err())?;
        let records = tables.entry(table.to_string()).or_default();

        let mut touched = Vec::new();
        for record in records.iter_mut() {
            if clauses.iter().all(|c| c.matches(record)) {
                if let Value::Object(map) = record {
                    for (key, value) in &patch {
                        map.insert(key.clone(), value.clone());
                    }
                }
                touched.push(record.clone());
            }
        }

        serde_json::to_vec(&touched).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn delete(&self, table: &str, filter: &str) -> BackendResult<Vec<u8>> {
        let (_, clauses) = parse_query(filter);

        let mut tables = self.tables.write().map_err(|_| Self::lock_err())?;
        let records = tables.entry(table.to_string()).or_default();

        let mut removed = Vec::new();
        records.retain(|record| {
            if clauses.iter().all(|c| c.matches(record)) {
                removed.push(record.clone());
                false
            } else {
                true
            }
        });

        serde_json::to_vec(&removed).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let backend = InMemoryBackend::new();
        let first = backend.insert("user", r#"{"json":{"n":1}}"#).await.unwrap();
        let second = backend.insert("user", r#"{"json":{"n":2}}"#).await.unwrap();

        let first: Vec<Value> = serde_json::from_slice(&first).unwrap();
        let second: Vec<Value> = serde_json::from_slice(&second).unwrap();
        assert_eq!(first[0]["id"], json!(1));
        assert_eq!(second[0]["id"], json!(2));
    }

    #[tokio::test]
    async fn test_select_by_native_id() {
        let backend = InMemoryBackend::new();
        backend.insert("user", r#"{"json":{"name":"Tom"}}"#).await.unwrap();
        backend.insert("user", r#"{"json":{"name":"Ann"}}"#).await.unwrap();

        let data = backend.select("user", "select=*&id=eq.2").await.unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["json"]["name"], json!("Ann"));
    }

    #[tokio::test]
    async fn test_select_by_document_field() {
        let backend = InMemoryBackend::new();
        backend.insert("user", r#"{"json":{"age":17}}"#).await.unwrap();
        backend.insert("user", r#"{"json":{"age":21}}"#).await.unwrap();

        let data = backend
            .select("user", "select=*&json->>age=gte.18")
            .await
            .unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["json"]["age"], json!(21));
    }

    #[tokio::test]
    async fn test_document_projection() {
        let backend = InMemoryBackend::new();
        backend.insert("user", r#"{"json":{"a":1}}"#).await.unwrap();

        let data = backend.select("user", "select=json&id=eq.1").await.unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&data).unwrap();
        assert_eq!(rows[0], json!({"json": {"a": 1}}));
    }

    #[tokio::test]
    async fn test_delete_returns_removed() {
        let backend = InMemoryBackend::new();
        backend.insert("user", r#"{"json":{"a":1}}"#).await.unwrap();

        let removed = backend.delete("user", "id=eq.1").await.unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&removed).unwrap();
        assert_eq!(rows.len(), 1);

        let data = backend.select("user", "select=*").await.unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&data).unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_percent_decoded_values() {
        let backend = InMemoryBackend::new();
        backend
            .insert("user", r#"{"json":{"city":"New York"}}"#)
            .await
            .unwrap();

        let data = backend
            .select("user", "select=*&json->>city=eq.New%20York")
            .await
            .unwrap();
        let rows: Vec<Value> = serde_json::from_slice(&data).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_like_match() {
        assert!(like_match("Johnson", "%son"));
        assert!(like_match("Wilson", "%son"));
        assert!(!like_match("Smith", "%son"));
        assert!(like_match("Tom", "T_m"));
        assert!(like_match("anything", "%"));
    }
}
