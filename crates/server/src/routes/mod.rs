use axum::{Router, middleware::from_fn_with_state};
use services::services::entity_schema::EntitySchema;
use tower_http::trace::TraceLayer;

use crate::{AppState, error::ApiError, middleware::require_session};

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod entities;
pub mod health;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(dashboard::router())
        .nest("/api", api::router())
        .merge(entities::router())
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Schema for the `{entity}` path segment.
pub(crate) fn lookup_schema(entity: &str) -> Result<&'static EntitySchema, ApiError> {
    EntitySchema::by_name(entity).ok_or_else(|| ApiError::UnknownEntity(entity.to_string()))
}
