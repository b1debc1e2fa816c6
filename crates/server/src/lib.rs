use std::sync::Arc;

use axum::Router;
use services::services::{backend::Backend, session::SessionStore};

pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod templates;

use templates::Templates;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "ama_session";

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub sessions: SessionStore,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(backend: Backend) -> Result<Self, tera::Error> {
        Ok(Self {
            backend,
            sessions: SessionStore::new(),
            templates: Arc::new(Templates::new()?),
        })
    }
}

pub fn app(state: AppState) -> Router {
    routes::router(state)
}
