use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{auth::AuthError, data_service::DataServiceError};
use thiserror::Error;
use tracing::error;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),
    #[error("no row with id '{0}'")]
    RowNotFound(String),
    #[error("not signed in")]
    Unauthorized,
    #[error("session is still being resolved")]
    SessionResolving,
    #[error("missing required fields")]
    Validation(BTreeMap<String, String>),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    DataService(#[from] DataServiceError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownEntity(_) | ApiError::RowNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized | ApiError::Auth(AuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::SessionResolving => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Auth(_) | ApiError::DataService(_) => StatusCode::BAD_GATEWAY,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        match self {
            ApiError::Validation(errors) => (
                status,
                Json(ApiResponse {
                    success: false,
                    data: Some(errors),
                    message: Some("missing required fields".to_string()),
                }),
            )
                .into_response(),
            other => (status, Json(ApiResponse::<()>::error(other.to_string()))).into_response(),
        }
    }
}
