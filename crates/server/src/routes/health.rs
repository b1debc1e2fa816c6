use axum::{Router, response::Json, routing::get};

use crate::{AppState, response::ApiResponse};

pub async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("OK"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
