use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::{record::TableRecord, table::Table};

/// Progress of a legal case or a service ticket.
#[derive(Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display)]
pub enum CaseStatus {
    #[sqlx(rename = "em andamento")]
    #[serde(rename = "em andamento")]
    #[strum(serialize = "em andamento")]
    EmAndamento,
    #[sqlx(rename = "concluído")]
    #[serde(rename = "concluído")]
    #[strum(serialize = "concluído")]
    Concluido,
}

/// A legal process or document tracked by the association (`juridico`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct LegalDocument {
    pub id: Uuid,
    pub processo_numero: String,
    pub descricao: String,
    pub status: CaseStatus,
    pub data_abertura: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateLegalDocument {
    pub processo_numero: String,
    pub descricao: String,
    pub status: CaseStatus,
    pub data_abertura: NaiveDate,
}

#[async_trait]
impl TableRecord for LegalDocument {
    type Create = CreateLegalDocument;

    const TABLE: Table = Table::Juridico;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateLegalDocument,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, LegalDocument>(
            r#"
            INSERT INTO juridico (id, processo_numero, descricao, status, data_abertura)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.processo_numero)
        .bind(&data.descricao)
        .bind(&data.status)
        .bind(data.data_abertura)
        .fetch_one(pool)
        .await
    }

    async fn update(conn: &mut SqliteConnection, record: &LegalDocument) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE juridico
            SET processo_numero = $2,
                descricao = $3,
                status = $4,
                data_abertura = $5,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.processo_numero)
        .bind(&record.descricao)
        .bind(&record.status)
        .bind(record.data_abertura)
        .execute(conn)
        .await?;
        Ok(())
    }
}
