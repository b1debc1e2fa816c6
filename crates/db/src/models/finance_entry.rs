use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::{record::TableRecord, table::Table};

#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
#[sqlx(type_name = "financeiro_tipo", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    Receita,
    Despesa,
}

/// A ledger line (`financeiro`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct FinanceEntry {
    pub id: Uuid,
    pub descricao: String,
    pub valor: f64,
    pub tipo: EntryKind,
    pub data: NaiveDate,
    pub categoria: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateFinanceEntry {
    pub descricao: String,
    pub valor: f64,
    pub tipo: EntryKind,
    pub data: NaiveDate,
    #[serde(default)]
    pub categoria: Option<String>,
}

#[async_trait]
impl TableRecord for FinanceEntry {
    type Create = CreateFinanceEntry;

    const TABLE: Table = Table::Financeiro;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateFinanceEntry,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, FinanceEntry>(
            r#"
            INSERT INTO financeiro (id, descricao, valor, tipo, data, categoria)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.descricao)
        .bind(data.valor)
        .bind(&data.tipo)
        .bind(data.data)
        .bind(&data.categoria)
        .fetch_one(pool)
        .await
    }

    async fn update(conn: &mut SqliteConnection, record: &FinanceEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE financeiro
            SET descricao = $2,
                valor = $3,
                tipo = $4,
                data = $5,
                categoria = $6,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.descricao)
        .bind(record.valor)
        .bind(&record.tipo)
        .bind(record.data)
        .bind(&record.categoria)
        .execute(conn)
        .await?;
        Ok(())
    }
}
