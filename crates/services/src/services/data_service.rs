//! Table-keyed data access consumed by every list page.

use async_trait::async_trait;
use db::models::table::{SortDirection, Table};
use thiserror::Error;

/// One backend row (or partial row) keyed by column name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The only failure the data service reports. Not-found, permission and
/// connectivity problems all arrive here with the backend's message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataServiceError {
    #[error("backend operation failed: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for DataServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<serde_json::Error> for DataServiceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<reqwest::Error> for DataServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Backend("request timed out".to_string())
        } else {
            Self::Backend(e.to_string())
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataService: Send + Sync {
    async fn read_all(
        &self,
        table: Table,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Record>, DataServiceError>;

    async fn insert(&self, table: Table, record: Record) -> Result<(), DataServiceError>;

    async fn update_by_id(
        &self,
        table: Table,
        id: &str,
        record: Record,
    ) -> Result<(), DataServiceError>;

    async fn delete_by_id(&self, table: Table, id: &str) -> Result<(), DataServiceError>;
}

/// Read the `id` column of a record as the opaque string the data service expects.
pub fn record_id(record: &Record) -> Option<String> {
    match record.get("id")? {
        serde_json::Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
