use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::SecretString;
use serde::Deserialize;
use services::services::auth::AuthError;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{AppState, SESSION_COOKIE, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// GET /auth
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let session = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.sessions.get_by_cookie(cookie.value()).await,
        None => None,
    };
    if let Some(session) = session {
        if session.identity().await.is_some() {
            return Ok(Redirect::to("/").into_response());
        }
    }
    Ok(Html(state.templates.login("", None)?).into_response())
}

/// POST /auth
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if let Some(previous) = session_id(&jar) {
        end_session(&state, previous).await;
    }
    let (id, session) = state.sessions.create().await;
    let password = SecretString::from(form.password);

    match state.backend.auth().sign_in(&form.email, &password).await {
        Ok(signed_in) => {
            session
                .sign_in(
                    signed_in.identity,
                    signed_in.access_token,
                    signed_in.expires_at,
                )
                .await;
            let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            Ok((jar.add(cookie), Redirect::to("/")).into_response())
        }
        Err(e) => {
            state.sessions.remove(id).await;
            let (status, message) = match &e {
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.")
                }
                AuthError::Backend(_) => {
                    error!(error = %e, "sign-in failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "Não foi possível entrar. Tente novamente.",
                    )
                }
            };
            let html = state.templates.login(form.email.trim(), Some(message))?;
            Ok((status, Html(html)).into_response())
        }
    }
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(id) = session_id(&jar) {
        end_session(&state, id).await;
    }

    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), Redirect::to("/auth")).into_response()
}

fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Drop the session and sign it out at the backend.
async fn end_session(state: &AppState, id: Uuid) {
    let Some(session) = state.sessions.remove(id).await else {
        return;
    };
    let token = session.access_token().await;
    if let Err(e) = state.backend.auth().sign_out(token.as_ref()).await {
        warn!(error = %e, "backend sign-out failed");
    }
    session.sign_out().await;
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}
