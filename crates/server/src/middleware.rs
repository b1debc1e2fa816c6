//! Route guard for everything behind the login screen.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use secrecy::SecretString;
use services::services::{
    data_service::DataService,
    session::{GuardDecision, Identity, SessionContext, guard},
};
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, SESSION_COOKIE, error::ApiError};

/// The signed-in session, available to protected handlers as an extension.
#[derive(Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub context: Arc<SessionContext>,
    pub identity: Identity,
}

impl CurrentSession {
    pub async fn access_token(&self) -> Option<SecretString> {
        self.context.access_token().await
    }

    /// Data service acting on behalf of this session.
    pub async fn data_service(&self, state: &AppState) -> Arc<dyn DataService> {
        state.backend.data_service(self.access_token().await)
    }
}

/// Let signed-in sessions through; send everyone else to `/auth`
/// (or answer 401 on the JSON API).
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let is_api = request.uri().path().starts_with("/api/");
    let session_id = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    let session = match session_id {
        Some(id) => state.sessions.get(id).await.map(|context| (id, context)),
        None => None,
    };

    let decision = match &session {
        Some((_, context)) => guard(&context.state().await),
        None => GuardDecision::RedirectToLogin,
    };

    match (decision, session) {
        (GuardDecision::Allow(identity), Some((id, context))) => {
            request.extensions_mut().insert(CurrentSession {
                id,
                context,
                identity,
            });
            next.run(request).await
        }
        (GuardDecision::Wait, _) => ApiError::SessionResolving.into_response(),
        _ => {
            debug!(path = %request.uri().path(), "unauthenticated request");
            if is_api {
                ApiError::Unauthorized.into_response()
            } else {
                Redirect::to("/auth").into_response()
            }
        }
    }
}
