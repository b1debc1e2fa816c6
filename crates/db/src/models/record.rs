//! Shared CRUD surface over the entity tables.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{FromRow, SqliteConnection, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::table::{SortDirection, Table};

/// A row type backed by one entity table.
///
/// Reads and deletes are generic over the table; inserts and updates are
/// spelled out per entity so every column is bound explicitly.
#[async_trait]
pub trait TableRecord:
    Serialize + DeserializeOwned + for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin + 'static
{
    /// Payload accepted on insert.
    type Create: DeserializeOwned + Send + Sync;

    const TABLE: Table;

    fn id(&self) -> Uuid;

    async fn create(pool: &SqlitePool, id: Uuid, data: &Self::Create) -> Result<Self, sqlx::Error>;

    /// Write every editable column of `record` back to its row.
    async fn update(conn: &mut SqliteConnection, record: &Self) -> Result<(), sqlx::Error>;

    async fn find_all(
        pool: &SqlitePool,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Self>, sqlx::Error> {
        if !Self::TABLE.has_column(order_by) {
            return Err(sqlx::Error::ColumnNotFound(order_by.to_string()));
        }
        // rowid breaks ties between rows created within the same millisecond
        let sql = format!(
            "SELECT * FROM {table} ORDER BY {order_by} {dir}, rowid {dir}",
            table = Self::TABLE.name(),
            dir = direction.as_sql(),
        );
        sqlx::query_as::<_, Self>(&sql).fetch_all(pool).await
    }

    async fn find_by_id(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", Self::TABLE.name());
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1", Self::TABLE.name());
        let result = sqlx::query(&sql).bind(id).execute(pool).await?;
        Ok(result.rows_affected())
    }
}
