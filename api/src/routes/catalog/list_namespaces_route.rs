//! GET /namespaces/{index_name}: namespaces inside one index.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::debug;

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    routes::catalog::catalog_response::NamespacesResponse,
};

pub async fn list_namespaces_route(
    State(state): State<Arc<AppState>>,
    Path(index_name): Path<String>,
) -> AppResult<Json<NamespacesResponse>> {
    let namespaces = state.contextor.list_namespaces(&index_name).await?;
    debug!(index = %index_name, count = namespaces.len(), "namespaces listed");
    Ok(Json(NamespacesResponse { namespaces }))
}
