//! POST /query: answer a question from the indexed documents.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use contextor::QueryRequest;
use tracing::info;

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::query::query_request::{QueryResponse, ScopeParams},
};

/// Handler: POST /query
///
/// # Example
/// ```bash
/// curl -X POST 'http://127.0.0.1:8000/query?index_name=docs&namespace=manuals' \
///   -H 'content-type: application/json' \
///   -d '{"query":"What is the rated pressure of pump A?","top_k":5}'
/// ```
pub async fn query_route(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ScopeParams>, QueryRejection>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<QueryResponse>> {
    let Query(params) = params?;
    let Json(req) = body?;
    let scope = params.into_scope()?;
    info!(scope = scope.label(), top_k = req.top_k, "query received");

    let (response, references) = state.contextor.ask(&req, &scope).await?.into_parts();

    Ok(Json(QueryResponse {
        response,
        success: true,
        references,
    }))
}
