use serde::{Deserialize, Serialize};

/// Response payload for GET /indexes.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexesResponse {
    pub indexes: Vec<String>,
}

/// Response payload for GET /namespaces/{index_name}.
#[derive(Debug, Serialize, Deserialize)]
pub struct NamespacesResponse {
    pub namespaces: Vec<String>,
}
