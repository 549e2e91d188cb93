//! GET /: liveness message.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

pub async fn root_route() -> Json<RootResponse> {
    Json(RootResponse {
        message: "PDF Query API is running",
    })
}
