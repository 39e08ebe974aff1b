//! # Filter Translation
//!
//! Converts raw query parameters into the backend's comparison-operator
//! filter syntax. A parameter like `?age=>=18` becomes the wire clause
//! `json->>age=gte.18`; multiple parameters are joined with `&`.
//!
//! Fields are either *native* (stored directly on the row, currently only
//! `id`) or *document* fields living inside the nested `json` column and
//! addressed with the arrow operator. `user_id` is deliberately treated as a
//! document field so scoping filters go through the document column like any
//! other user attribute.

use std::collections::{BTreeMap, BTreeSet};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in filter values (RFC 3986 unreserved set)
const VALUE_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Filter operators understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,
    /// Not equals
    Neq,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Pattern match (LIKE)
    Like,
}

impl FilterOperator {
    /// Wire token for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Like => "like",
        }
    }

    /// Parse a wire token back into an operator
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(FilterOperator::Eq),
            "neq" => Some(FilterOperator::Neq),
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "like" => Some(FilterOperator::Like),
            _ => None,
        }
    }
}

/// Value prefixes mapped to operators, checked in order.
///
/// `like:` must come first, and the two-character comparisons must come
/// before their one-character prefixes.
const OPERATOR_PREFIXES: &[(&str, FilterOperator)] = &[
    ("like:", FilterOperator::Like),
    (">=", FilterOperator::Gte),
    ("<=", FilterOperator::Lte),
    ("!=", FilterOperator::Neq),
    (">", FilterOperator::Gt),
    ("<", FilterOperator::Lt),
];

/// Split a raw value into its operator and remaining payload.
///
/// No recognized prefix means equality on the whole value.
pub fn detect_operator(value: &str) -> (FilterOperator, &str) {
    for (prefix, op) in OPERATOR_PREFIXES {
        if let Some(rest) = value.strip_prefix(prefix) {
            return (*op, rest);
        }
    }
    (FilterOperator::Eq, value)
}

/// Builds filter strings from query parameters.
///
/// Holds the reserved-parameter and native-field sets as explicit state so
/// call sites share one classification instead of scattered globals.
#[derive(Debug, Clone)]
pub struct FilterBuilder {
    /// Parameter names never translated into clauses
    reserved: BTreeSet<String>,
    /// Fields stored directly on the row rather than in the document column
    native: BTreeSet<String>,
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self {
            reserved: ["action", "table"].iter().map(|s| s.to_string()).collect(),
            native: ["id"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a full parameter map into a filter string.
    ///
    /// Returns the empty string when nothing translates, which callers must
    /// treat as "no filter" (and reject for update/delete). Clause order
    /// follows the map's sorted key order so the output is deterministic.
    pub fn build(&self, params: &BTreeMap<String, String>) -> String {
        let clauses: Vec<String> = params
            .iter()
            .filter_map(|(key, value)| self.clause(key, value))
            .collect();

        let filter = clauses.join("&");
        tracing::debug!(filter = %filter, "built filter");
        filter
    }

    /// Translate a single key/value pair, or `None` for reserved keys.
    pub fn clause(&self, key: &str, value: &str) -> Option<String> {
        if self.reserved.contains(key) {
            return None;
        }

        // Optional explicit document prefix: ?json.name=Tom
        let field = key.strip_prefix("json.").unwrap_or(key);

        let (op, raw) = detect_operator(value);
        let escaped = utf8_percent_encode(raw, VALUE_ESCAPE).to_string();

        if self.native.contains(field) {
            Some(format!("{}={}.{}", field, op.as_str(), escaped))
        } else {
            Some(format!("json->>{}={}.{}", field, op.as_str(), escaped))
        }
    }
}
