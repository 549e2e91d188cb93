//! Retrieval: run the vector searches a [`SearchScope`] calls for.
//!
//! Scoped search propagates its failure. Fan-out over namespaces or indexes
//! logs and skips individual failures.

use futures::stream::{self, StreamExt};
use rag_store::{SearchMatch, VectorSearch};
use tracing::{debug, warn};

use crate::api_types::SearchScope;
use crate::error::ContextorError;

/// One (index, namespace) pair to search during fan-out.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Target {
    index: String,
    namespace: String,
}

/// Collects raw matches for `scope`. Ranking and truncation happen later.
///
/// Matches come back in call order: target by target, each target's matches
/// in the order the provider returned them.
pub async fn collect_matches(
    store: &dyn VectorSearch,
    vector: &[f32],
    scope: &SearchScope,
    top_k: usize,
    concurrency: usize,
) -> Result<Vec<SearchMatch>, ContextorError> {
    match scope {
        SearchScope::Namespace { index, namespace } => store
            .search(vector, index, Some(namespace.as_str()), top_k)
            .await
            .map_err(ContextorError::Search),
        SearchScope::Index { index } => {
            let namespaces = store
                .list_namespaces(index)
                .await
                .map_err(|source| ContextorError::Catalog {
                    what: "namespaces",
                    source,
                })?;
            let targets = namespaces
                .into_iter()
                .map(|namespace| Target {
                    index: index.clone(),
                    namespace,
                })
                .collect();
            Ok(fan_out(store, vector, targets, top_k, concurrency).await)
        }
        SearchScope::Database => {
            let targets = database_targets(store).await?;
            Ok(fan_out(store, vector, targets, top_k, concurrency).await)
        }
    }
}

/// Every (index, namespace) pair in the database. Indexes whose namespaces
/// cannot be listed are skipped.
async fn database_targets(store: &dyn VectorSearch) -> Result<Vec<Target>, ContextorError> {
    let indexes = store
        .list_indexes()
        .await
        .map_err(|source| ContextorError::Catalog {
            what: "indexes",
            source,
        })?;

    let mut targets = Vec::new();
    for index in indexes {
        match store.list_namespaces(&index).await {
            Ok(namespaces) => targets.extend(namespaces.into_iter().map(|namespace| Target {
                index: index.clone(),
                namespace,
            })),
            Err(e) => warn!(index = %index, error = %e, "skipping index: namespace listing failed"),
        }
    }
    Ok(targets)
}

async fn fan_out(
    store: &dyn VectorSearch,
    vector: &[f32],
    targets: Vec<Target>,
    top_k: usize,
    concurrency: usize,
) -> Vec<SearchMatch> {
    debug!(targets = targets.len(), concurrency, "fan-out start");

    let results: Vec<(Target, Result<Vec<SearchMatch>, rag_store::RagError>)> =
        stream::iter(targets)
            .map(|t| async move {
                let res = store
                    .search(vector, &t.index, Some(t.namespace.as_str()), top_k)
                    .await;
                (t, res)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut all = Vec::new();
    for (t, res) in results {
        match res {
            Ok(matches) => all.extend(matches),
            Err(e) => warn!(
                index = %t.index,
                namespace = %t.namespace,
                error = %e,
                "skipping namespace: search failed"
            ),
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rag_store::RagError;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory catalog: index -> namespace -> match ids.
    struct Catalog {
        data: BTreeMap<String, BTreeMap<String, Vec<(&'static str, f32)>>>,
        broken: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl Catalog {
        /// One `(index, namespace, match id, score)` row per namespace.
        fn new(entries: &[(&str, &str, &'static str, f32)]) -> Self {
            let mut data: BTreeMap<String, BTreeMap<String, Vec<_>>> = BTreeMap::new();
            for &(idx, ns, id, score) in entries {
                data.entry(idx.to_string())
                    .or_default()
                    .insert(ns.to_string(), vec![(id, score)]);
            }
            Self {
                data,
                broken: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn broken(mut self, key: &str) -> Self {
            self.broken.push(key.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn fail(what: &str) -> RagError {
        RagError::Decode(format!("{what} unavailable"))
    }

    #[async_trait]
    impl VectorSearch for Catalog {
        async fn list_indexes(&self) -> Result<Vec<String>, RagError> {
            if self.broken.iter().any(|b| b == "*") {
                return Err(fail("indexes"));
            }
            Ok(self.data.keys().cloned().collect())
        }

        async fn list_namespaces(&self, index_name: &str) -> Result<Vec<String>, RagError> {
            if self.broken.iter().any(|b| b == index_name) {
                return Err(fail(index_name));
            }
            self.data
                .get(index_name)
                .map(|m| m.keys().cloned().collect())
                .ok_or_else(|| RagError::IndexNotFound(index_name.to_string()))
        }

        async fn search(
            &self,
            _vector: &[f32],
            index_name: &str,
            namespace: Option<&str>,
            top_k: usize,
        ) -> Result<Vec<SearchMatch>, RagError> {
            let ns = namespace.unwrap_or_default();
            let key = format!("{index_name}/{ns}");
            self.calls.lock().unwrap().push(key.clone());
            if self.broken.contains(&key) {
                return Err(fail(&key));
            }
            let hits = self
                .data
                .get(index_name)
                .and_then(|m| m.get(ns))
                .cloned()
                .unwrap_or_default();
            Ok(hits
                .into_iter()
                .take(top_k)
                .map(|(id, score)| SearchMatch {
                    id: id.into(),
                    score,
                    metadata: Default::default(),
                    namespace: ns.to_string(),
                    index_name: index_name.to_string(),
                })
                .collect())
        }
    }

    fn ids(matches: &[SearchMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.id.as_str()).collect()
    }

    #[tokio::test]
    async fn scoped_search_hits_one_pair() {
        let store = Catalog::new(&[("docs", "a", "x", 0.5), ("docs", "b", "y", 0.6)]);
        let scope = SearchScope::Namespace {
            index: "docs".into(),
            namespace: "b".into(),
        };
        let matches = collect_matches(&store, &[0.1], &scope, 5, 1).await.unwrap();
        assert_eq!(ids(&matches), ["y"]);
        assert_eq!(store.calls(), ["docs/b"]);
    }

    #[tokio::test]
    async fn scoped_failure_propagates() {
        let store = Catalog::new(&[("docs", "a", "x", 0.5)]).broken("docs/a");
        let scope = SearchScope::Namespace {
            index: "docs".into(),
            namespace: "a".into(),
        };
        let err = collect_matches(&store, &[0.1], &scope, 5, 1).await.unwrap_err();
        assert_eq!(err.kind(), "SEARCH_FAILED");
    }

    #[tokio::test]
    async fn index_scope_searches_every_namespace() {
        let store = Catalog::new(&[
            ("docs", "a", "x", 0.5),
            ("docs", "b", "y", 0.6),
            ("other", "c", "z", 0.9),
        ]);
        let scope = SearchScope::Index { index: "docs".into() };
        let matches = collect_matches(&store, &[0.1], &scope, 5, 1).await.unwrap();
        assert_eq!(ids(&matches), ["x", "y"]);
        assert_eq!(store.calls(), ["docs/a", "docs/b"]);
    }

    #[tokio::test]
    async fn index_scope_listing_failure_propagates() {
        let store = Catalog::new(&[("docs", "a", "x", 0.5)]).broken("docs");
        let scope = SearchScope::Index { index: "docs".into() };
        let err = collect_matches(&store, &[0.1], &scope, 5, 1).await.unwrap_err();
        assert_eq!(err.kind(), "CATALOG_FAILED");
        assert!(err.to_string().starts_with("Failed to list namespaces"));
    }

    #[tokio::test]
    async fn database_scope_makes_one_search_per_namespace() {
        let store = Catalog::new(&[("A", "ns", "x", 0.4), ("B", "ns", "y", 0.7)]);
        let matches = collect_matches(&store, &[0.1], &SearchScope::Database, 5, 1)
            .await
            .unwrap();
        assert_eq!(store.calls().len(), 2);
        assert_eq!(ids(&matches), ["x", "y"]);
        assert_eq!(matches[1].index_name, "B");
    }

    #[tokio::test]
    async fn database_scope_skips_failing_namespace_and_index() {
        let store = Catalog::new(&[
            ("A", "bad", "x", 0.4),
            ("A", "good", "y", 0.7),
            ("B", "ns", "z", 0.9),
            ("C", "ns", "w", 0.3),
        ])
        .broken("A/bad")
        .broken("B");
        let matches = collect_matches(&store, &[0.1], &SearchScope::Database, 5, 1)
            .await
            .unwrap();
        assert_eq!(ids(&matches), ["y", "w"]);
        assert_eq!(store.calls(), ["A/bad", "A/good", "C/ns"]);
    }

    #[tokio::test]
    async fn database_scope_index_listing_failure_propagates() {
        let store = Catalog::new(&[("A", "ns", "x", 0.4)]).broken("*");
        let err = collect_matches(&store, &[0.1], &SearchScope::Database, 5, 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "CATALOG_FAILED");
    }

    #[tokio::test]
    async fn concurrency_keeps_call_order() {
        let store = Catalog::new(&[
            ("docs", "a", "x", 0.1),
            ("docs", "b", "y", 0.2),
            ("docs", "c", "z", 0.3),
        ]);
        let scope = SearchScope::Index { index: "docs".into() };
        let matches = collect_matches(&store, &[0.1], &scope, 5, 3).await.unwrap();
        assert_eq!(ids(&matches), ["x", "y", "z"]);
    }

    #[tokio::test]
    async fn zero_concurrency_is_treated_as_sequential() {
        let store = Catalog::new(&[("docs", "a", "x", 0.1)]);
        let scope = SearchScope::Index { index: "docs".into() };
        let matches = collect_matches(&store, &[0.1], &scope, 5, 0).await.unwrap();
        assert_eq!(ids(&matches), ["x"]);
    }
}
