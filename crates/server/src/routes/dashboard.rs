use axum::{
    Extension, Router,
    extract::State,
    response::Html,
    routing::get,
};
use services::services::dashboard::Dashboard;

use crate::{AppState, error::ApiError, middleware::CurrentSession};

/// GET /
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<Html<String>, ApiError> {
    let dashboard = Dashboard::new(chrono::Local::now().naive_local());
    Ok(Html(state.templates.dashboard(&session.identity, &dashboard)?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}
