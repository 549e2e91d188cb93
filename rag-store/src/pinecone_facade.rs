//! Thin adapter around the Pinecone REST API to isolate wire details.
//!
//! Control plane (`{controller_url}`):
//! - `GET /indexes`          → index names and hosts
//! - `GET /indexes/{name}`   → host of one index
//!
//! Data plane (`https://{host}`):
//! - `POST /describe_index_stats` → per-namespace stats
//! - `POST /query`                → nearest neighbours with metadata

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode, Url, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, error, trace};

use crate::config::PineconeConfig;
use crate::errors::RagError;
use crate::record::{
    IndexDescription, IndexList, IndexStats, QueryRequest, QueryResponse, SearchMatch,
    matches_from_response, namespaces_from_stats,
};

const SNIPPET_MAX_CHARS: usize = 300;

/// A facade over the Pinecone HTTP API.
///
/// Holds one preconfigured `reqwest::Client` (auth + version headers, timeout)
/// and the data-plane host of every index seen so far. Hosts are learned from
/// `GET /indexes` or `GET /indexes/{name}` and dropped when a data-plane call
/// against them fails.
pub struct PineconeFacade {
    client: reqwest::Client,
    controller: Url,
    hosts: RwLock<HashMap<String, String>>,
}

impl PineconeFacade {
    /// Creates a new facade from the given configuration.
    pub fn new(cfg: &PineconeConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let controller = Url::parse(cfg.controller_url.trim())
            .map_err(|e| RagError::Config(format!("invalid controller_url: {e}")))?;
        if controller.cannot_be_a_base() {
            return Err(RagError::Config("controller_url cannot carry a path".into()));
        }

        let mut headers = header::HeaderMap::new();
        let api_key = header::HeaderValue::from_str(&cfg.api_key)
            .map_err(|e| RagError::Config(format!("invalid api key header: {e}")))?;
        headers.insert("Api-Key", api_key);
        let version = header::HeaderValue::from_str(&cfg.api_version)
            .map_err(|e| RagError::Config(format!("invalid api version header: {e}")))?;
        headers.insert("X-Pinecone-API-Version", version);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            controller,
            hosts: RwLock::new(HashMap::new()),
        })
    }

    /// Lists index names known to the project and remembers their hosts.
    pub async fn list_indexes(&self) -> Result<Vec<String>, RagError> {
        let url = self.controller_url(&["indexes"])?;
        let list: IndexList = self.send_json(Method::GET, url.as_str(), None::<&()>).await?;

        let mut names = Vec::with_capacity(list.indexes.len());
        for desc in list.indexes {
            if let Some(host) = usable_host(desc.host.as_deref()) {
                self.remember_host(&desc.name, host);
            }
            names.push(desc.name);
        }
        Ok(names)
    }

    /// Resolves the data-plane base URL of an index.
    pub async fn index_host(&self, index_name: &str) -> Result<String, RagError> {
        check_index_name(index_name)?;
        if let Some(base) = self.cached_host(index_name) {
            trace!(index = index_name, "index host from cache");
            return Ok(base);
        }

        let url = self.controller_url(&["indexes", index_name])?;
        let desc: IndexDescription =
            match self.send_json(Method::GET, url.as_str(), None::<&()>).await {
                Err(RagError::HttpStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                    return Err(RagError::IndexNotFound(index_name.to_string()));
                }
                other => other?,
            };

        let host = usable_host(desc.host.as_deref())
            .ok_or_else(|| RagError::Decode(format!("index '{}' has no host", desc.name)))?;
        Ok(self.remember_host(index_name, host))
    }

    /// Namespace names of one index, derived from its stats.
    pub async fn list_namespaces(&self, index_name: &str) -> Result<Vec<String>, RagError> {
        let base = self.index_host(index_name).await?;
        let url = format!("{base}/describe_index_stats");
        let stats: IndexStats = self.data_plane(index_name, &url, &json!({})).await?;
        Ok(namespaces_from_stats(stats))
    }

    /// Top-K query inside one index and (optionally) one namespace.
    pub async fn query(
        &self,
        vector: &[f32],
        index_name: &str,
        namespace: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<SearchMatch>, RagError> {
        let base = self.index_host(index_name).await?;
        let url = format!("{base}/query");
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace,
        };
        let resp: QueryResponse = self.data_plane(index_name, &url, &body).await?;
        matches_from_response(resp, index_name, namespace)
    }

    /// `{controller}/seg/seg…` with every segment percent-encoded on its own.
    fn controller_url(&self, segments: &[&str]) -> Result<Url, RagError> {
        let mut url = self.controller.clone();
        url.path_segments_mut()
            .map_err(|_| RagError::Config("controller_url cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POSTs to an index host; the cached host is dropped if the call fails.
    async fn data_plane<B, T>(&self, index_name: &str, url: &str, body: &B) -> Result<T, RagError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.send_json(Method::POST, url, Some(body)).await;
        if res.is_err() {
            self.forget_host(index_name);
        }
        res
    }

    fn cached_host(&self, index_name: &str) -> Option<String> {
        self.hosts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index_name)
            .cloned()
    }

    fn remember_host(&self, index_name: &str, host: &str) -> String {
        let base = host_base_url(host);
        self.hosts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(index_name.to_string(), base.clone());
        base
    }

    fn forget_host(&self, index_name: &str) {
        self.hosts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(index_name);
    }

    /// Sends a request and decodes a JSON body, mapping non-2xx to `RagError::HttpStatus`.
    async fn send_json<B, T>(&self, method: Method, url: &str, body: Option<&B>) -> Result<T, RagError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let started = Instant::now();
        debug!("{} {}", method, url);

        let mut req = self.client.request(method.clone(), url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis() as u64,
                "pinecone {} returned non-success status", method
            );
            return Err(RagError::HttpStatus {
                status,
                url: url.to_string(),
                snippet,
            });
        }

        let parsed = resp
            .json::<T>()
            .await
            .map_err(|e| RagError::Decode(format!("{method} {url}: {e}")))?;

        trace!(
            %url,
            latency_ms = started.elapsed().as_millis() as u64,
            "pinecone request completed"
        );
        Ok(parsed)
    }
}

/// Index names travel as one path segment; `.` and `..` would be swallowed by
/// URL normalisation.
fn check_index_name(name: &str) -> Result<(), RagError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(RagError::InvalidIndexName(name.to_string()));
    }
    Ok(())
}

fn usable_host(host: Option<&str>) -> Option<&str> {
    host.filter(|h| !h.trim().is_empty())
}

/// Index hosts are reported without a scheme; local emulators may include one.
fn host_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// One-line, bounded copy of an error body; `…` marks a cut.
fn make_snippet(body: &str) -> String {
    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= SNIPPET_MAX_CHARS {
        return flat;
    }
    let mut out: String = flat.chars().take(SNIPPET_MAX_CHARS).collect();
    out.push('…');
    out
}
