//! Sign-in providers for the console.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::{rest_data_service::service_url, session::Identity};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("auth backend error: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: Identity,
    /// Bearer token for backends that enforce per-user policies.
    pub access_token: Option<SecretString>,
    /// When `access_token` stops being accepted by the backend.
    pub expires_at: Option<Instant>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SignedIn, AuthError>;

    async fn sign_out(&self, access_token: Option<&SecretString>) -> Result<(), AuthError>;
}

/// A single operator account taken from configuration.
pub struct OperatorAuthProvider {
    email: String,
    password: SecretString,
}

impl OperatorAuthProvider {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

#[async_trait]
impl AuthProvider for OperatorAuthProvider {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SignedIn, AuthError> {
        let email_ok = email.trim().eq_ignore_ascii_case(&self.email);
        let password_ok: bool = password
            .expose_secret()
            .as_bytes()
            .ct_eq(self.password.expose_secret().as_bytes())
            .into();
        if !(email_ok && password_ok) {
            warn!(email = %email.trim(), "rejected operator sign-in");
            return Err(AuthError::InvalidCredentials);
        }
        info!(email = %self.email, "operator signed in");
        Ok(SignedIn {
            identity: Identity {
                email: self.email.clone(),
                user_id: None,
            },
            access_token: None,
            expires_at: None,
        })
    }

    async fn sign_out(&self, _access_token: Option<&SecretString>) -> Result<(), AuthError> {
        Ok(())
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Seconds until the token expires.
    expires_in: Option<u64>,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

/// Email/password accounts of the hosted backend (GoTrue).
pub struct SupabaseAuthProvider {
    http: Client,
    auth_url: Url,
    api_key: SecretString,
}

impl SupabaseAuthProvider {
    pub fn new(base_url: &Url, api_key: SecretString) -> Result<Self, AuthError> {
        let http = Client::builder()
            .user_agent(concat!("ama-console/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            auth_url: service_url(base_url, "auth/v1/").map_err(AuthError::Backend)?,
            api_key,
        })
    }

    pub fn token_url(&self) -> Url {
        let mut url = self.endpoint("token");
        url.query_pairs_mut().append_pair("grant_type", "password");
        url
    }

    pub fn logout_url(&self) -> Url {
        self.endpoint("logout")
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.auth_url.clone();
        url.set_path(&format!("{}{}", self.auth_url.path(), name));
        url
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthProvider {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<SignedIn, AuthError> {
        let res = self
            .http
            .post(self.token_url())
            .header("apikey", self.api_key.expose_secret())
            .json(&PasswordGrant {
                email: email.trim(),
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            warn!(email = %email.trim(), "rejected sign-in");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AuthError::Backend(format!(
                "http {}: {}",
                status.as_u16(),
                auth_error_message(&body)
            )));
        }

        let token: TokenResponse = res.json().await?;
        let email = token.user.email.unwrap_or_else(|| email.trim().to_string());
        let expires_at = token_expiry(Instant::now(), token.expires_in);
        info!(email = %email, expires_in = ?token.expires_in, "signed in");
        Ok(SignedIn {
            identity: Identity {
                email,
                user_id: Some(token.user.id),
            },
            access_token: Some(SecretString::from(token.access_token)),
            expires_at,
        })
    }

    async fn sign_out(&self, access_token: Option<&SecretString>) -> Result<(), AuthError> {
        let Some(token) = access_token else {
            return Ok(());
        };
        let res = self
            .http
            .post(self.logout_url())
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AuthError::Backend(format!(
                "http {}: {}",
                status.as_u16(),
                auth_error_message(&body)
            )));
        }
        Ok(())
    }
}

/// Expiry of a freshly issued token, shortened by a margin so a request
/// never starts with a token about to lapse.
fn token_expiry(issued: Instant, expires_in: Option<u64>) -> Option<Instant> {
    const MARGIN: Duration = Duration::from_secs(60);
    let ttl = Duration::from_secs(expires_in?);
    Some(issued + ttl.saturating_sub(MARGIN))
}

fn auth_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "msg", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}
