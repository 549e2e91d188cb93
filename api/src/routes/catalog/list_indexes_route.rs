//! GET /indexes: every Pinecone index name.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::debug;

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    routes::catalog::catalog_response::IndexesResponse,
};

/// Handler: GET /indexes
///
/// # Example
/// ```bash
/// curl http://127.0.0.1:8000/indexes
/// ```
pub async fn list_indexes_route(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<IndexesResponse>> {
    let indexes = state.contextor.list_indexes().await?;
    debug!(count = indexes.len(), "indexes listed");
    Ok(Json(IndexesResponse { indexes }))
}
