//! Data types crossing the crate boundary, plus the Pinecone wire models
//! they are built from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::RagError;

/// One nearest-neighbour hit, annotated with where it came from.
///
/// Built right after each provider call; raw Pinecone payloads never leave this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchMatch {
    /// Vector id inside the index.
    pub id: String,
    /// Similarity score as reported by the index (higher is closer).
    pub score: f32,
    /// Stored metadata; may carry `text`, `file_name`, `page`.
    pub metadata: Map<String, Value>,
    /// Namespace the match was found in (`""` is the default namespace).
    pub namespace: String,
    /// Index the match was found in.
    pub index_name: String,
}

impl SearchMatch {
    /// Chunk text, if the metadata carries a string `text` field.
    pub fn text(&self) -> Option<&str> {
        self.metadata.get("text").and_then(Value::as_str)
    }

    /// Source file name, if present as a string.
    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get("file_name").and_then(Value::as_str)
    }

    /// Page number, if present.
    ///
    /// Pinecone stores numbers as floats, so `3.0` and `"3"` both yield `3`;
    /// fractional or non-numeric values count as missing.
    pub fn page(&self) -> Option<i64> {
        match self.metadata.get("page")? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/* ===========================================================================
Pinecone wire models
======================================================================== */

/// `GET /indexes` response.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexList {
    #[serde(default)]
    pub indexes: Vec<IndexDescription>,
}

/// `GET /indexes/{name}` response (also the items of [`IndexList`]).
#[derive(Debug, Deserialize)]
pub(crate) struct IndexDescription {
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
}

/// `POST /describe_index_stats` response; only the namespace map is used.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexStats {
    #[serde(default)]
    pub namespaces: BTreeMap<String, Value>,
}

/// `POST /query` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRequest<'a> {
    pub vector: &'a [f32],
    pub top_k: usize,
    pub include_metadata: bool,
    pub include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

/// `POST /query` response.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<RawMatch>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMatch {
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Namespace names reported by index stats, in stable (sorted) order.
pub(crate) fn namespaces_from_stats(stats: IndexStats) -> Vec<String> {
    stats.namespaces.into_keys().collect()
}

/// Converts a raw query response into annotated [`SearchMatch`]es.
///
/// The namespace annotation prefers the one that was requested, then the one
/// echoed by the server, then the default namespace.
pub(crate) fn matches_from_response(
    resp: QueryResponse,
    index_name: &str,
    requested_namespace: Option<&str>,
) -> Result<Vec<SearchMatch>, RagError> {
    let namespace = requested_namespace
        .map(str::to_string)
        .or(resp.namespace)
        .unwrap_or_default();

    resp.matches
        .into_iter()
        .map(|m| {
            let score = m.score.ok_or_else(|| {
                RagError::Decode(format!("match '{}' has no score", m.id))
            })?;
            Ok(SearchMatch {
                id: m.id,
                score,
                metadata: m.metadata.unwrap_or_default(),
                namespace: namespace.clone(),
                index_name: index_name.to_string(),
            })
        })
        .collect()
}
