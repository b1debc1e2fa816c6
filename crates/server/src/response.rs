use serde::Serialize;
use ts_rs::TS;

/// Envelope of every JSON response.
#[derive(Debug, Serialize, TS)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Data that was produced despite a failure along the way.
    pub fn partial(data: T, message: Option<String>) -> Self {
        Self {
            success: message.is_none(),
            data: Some(data),
            message,
        }
    }
}
