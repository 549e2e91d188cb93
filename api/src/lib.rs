//! HTTP surface of the PDF query service.

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

pub use crate::core::{app_config::AppConfig, app_state::AppState};
pub use crate::error_handler::AppError;

use crate::routes::{
    catalog::{list_indexes_route::list_indexes_route, list_namespaces_route::list_namespaces_route},
    query::query_route::query_route,
    root_route::root_route,
};

/// All routes, wrapped in the request-id layer.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_route))
        .route("/indexes", get(list_indexes_route))
        .route("/namespaces/{index_name}", get(list_namespaces_route))
        .route("/query", post(query_route))
        .layer(middleware::from_fn(middleware_layer::request_id::request_id))
        .with_state(state)
}

/// Build providers from the environment, bind, and serve until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    let state = Arc::new(AppState::from_env().await?);
    serve(config, state).await
}

pub async fn serve(config: AppConfig, state: Arc<AppState>) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(config.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %config.address, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::AiLlmError;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use contextor::{ChatModel, Contextor, ContextorConfig, INSUFFICIENT_INFO_ANSWER, QueryEmbedder};
    use http_body_util::BodyExt;
    use rag_store::{RagError, SearchMatch, VectorSearch};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct Embedder;

    #[async_trait]
    impl QueryEmbedder for Embedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, AiLlmError> {
            Ok(vec![0.5; 4])
        }
    }

    #[derive(Default)]
    struct Chat {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatModel for Chat {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String, AiLlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Pump A is rated for 5 bar.".into())
        }
    }

    /// Two indexes: `docs` with namespaces `manuals` and `specs`, `empty` with none.
    #[derive(Default)]
    struct Store {
        searches: Mutex<Vec<String>>,
        no_text: bool,
        broken: bool,
    }

    #[async_trait]
    impl VectorSearch for Store {
        async fn list_indexes(&self) -> Result<Vec<String>, RagError> {
            if self.broken {
                return Err(RagError::Decode("controller down".into()));
            }
            Ok(vec!["docs".into(), "empty".into()])
        }

        async fn list_namespaces(&self, index_name: &str) -> Result<Vec<String>, RagError> {
            match index_name {
                "docs" => Ok(vec!["manuals".into(), "specs".into()]),
                "empty" => Ok(vec![]),
                other => Err(RagError::IndexNotFound(other.into())),
            }
        }

        async fn search(
            &self,
            _vector: &[f32],
            index_name: &str,
            namespace: Option<&str>,
            _top_k: usize,
        ) -> Result<Vec<SearchMatch>, RagError> {
            let ns = namespace.unwrap_or_default().to_string();
            self.searches.lock().unwrap().push(format!("{index_name}/{ns}"));
            let meta = if self.no_text {
                json!({"file_name": "pump.pdf", "page": 3})
            } else {
                json!({"text": format!("chunk from {ns}"), "file_name": format!("{ns}.pdf"), "page": 3.0})
            };
            Ok(vec![SearchMatch {
                id: format!("{ns}-1"),
                score: if ns == "specs" { 0.9 } else { 0.7 },
                metadata: meta.as_object().cloned().unwrap_or_default(),
                namespace: ns,
                index_name: index_name.into(),
            }])
        }
    }

    struct Fixture {
        store: Arc<Store>,
        chat: Arc<Chat>,
        app: Router,
    }

    fn fixture(store: Store) -> Fixture {
        let store = Arc::new(store);
        let chat = Arc::new(Chat::default());
        let contextor = Contextor::new(
            Arc::new(Embedder),
            store.clone(),
            chat.clone(),
            ContextorConfig::default(),
        );
        let app = router(Arc::new(AppState::new(contextor)));
        Fixture { store, chat, app }
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let request_id = res
            .headers()
            .get("x-request-id")
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body, request_id)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_query(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn root_reports_running() {
        let f = fixture(Store::default());
        let (status, body, request_id) = send(f.app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "PDF Query API is running"}));
        assert!(request_id.unwrap().starts_with("req-"));
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let f = fixture(Store::default());
        let req = Request::builder()
            .uri("/")
            .header("X-Request-Id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let (_, _, request_id) = send(f.app, req).await;
        assert_eq!(request_id.as_deref(), Some("abc-123"));
    }

    #[tokio::test]
    async fn lists_indexes_and_namespaces() {
        let f = fixture(Store::default());
        let (status, body, _) = send(f.app.clone(), get_req("/indexes")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"indexes": ["docs", "empty"]}));

        let (status, body, _) = send(f.app, get_req("/namespaces/docs")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"namespaces": ["manuals", "specs"]}));
    }

    #[tokio::test]
    async fn unknown_index_is_internal_error() {
        let f = fixture(Store::default());
        let (status, body, _) = send(f.app, get_req("/namespaces/nope")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "CATALOG_FAILED");
        assert!(body["message"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn catalog_failure_is_internal_error() {
        let f = fixture(Store {
            broken: true,
            ..Store::default()
        });
        let (status, body, _) = send(f.app, get_req("/indexes")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to list indexes: decode error: controller down");
    }

    #[tokio::test]
    async fn scoped_query_searches_one_namespace() {
        let f = fixture(Store::default());
        let (status, body, _) = send(
            f.app,
            post_query(
                "/query?index_name=docs&namespace=manuals",
                json!({"query": "pump pressure", "top_k": 5}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*f.store.searches.lock().unwrap(), ["docs/manuals"]);
        assert_eq!(body["success"], true);
        assert_eq!(body["response"], "Pump A is rated for 5 bar.");
        assert_eq!(
            body["references"],
            json!([{"file_name": "manuals.pdf", "page": 3, "namespace": "manuals", "index_name": "docs"}])
        );
    }

    #[tokio::test]
    async fn index_query_fans_out_and_ranks() {
        let f = fixture(Store::default());
        let (status, body, _) =
            send(f.app, post_query("/query?index_name=docs", json!({"query": "pump"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*f.store.searches.lock().unwrap(), ["docs/manuals", "docs/specs"]);
        let files: Vec<_> = body["references"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["file_name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(files, ["specs.pdf", "manuals.pdf"]);
    }

    #[tokio::test]
    async fn database_query_walks_every_index() {
        let f = fixture(Store::default());
        let (status, _, _) = send(f.app, post_query("/query", json!({"query": "pump"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(f.store.searches.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn empty_context_returns_fallback() {
        let f = fixture(Store {
            no_text: true,
            ..Store::default()
        });
        let (status, body, _) = send(f.app, post_query("/query", json!({"query": "pump"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"response": INSUFFICIENT_INFO_ANSWER, "success": true, "references": []})
        );
        assert_eq!(f.chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn out_of_range_top_k_is_unprocessable() {
        let f = fixture(Store::default());
        let (status, body, _) =
            send(f.app, post_query("/query", json!({"query": "pump", "top_k": 21}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "INVALID_REQUEST");
        assert!(f.store.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_is_unprocessable() {
        let f = fixture(Store::default());
        let (status, body, _) =
            send(f.app, post_query("/query", json!({"question": "pump"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn namespace_without_index_is_rejected() {
        let f = fixture(Store::default());
        let (status, body, _) =
            send(f.app, post_query("/query?namespace=manuals", json!({"query": "pump"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "BAD_REQUEST");
        assert!(f.store.searches.lock().unwrap().is_empty());
    }
}
