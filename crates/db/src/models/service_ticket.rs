use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::{legal_document::CaseStatus, record::TableRecord, table::Table};

/// A member service request (`atendimento`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ServiceTicket {
    pub id: Uuid,
    pub associado_id: Uuid, // Foreign key to Member
    pub descricao: String,
    pub status: CaseStatus,
    pub data_abertura: NaiveDate,
    pub data_conclusao: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateServiceTicket {
    pub associado_id: Uuid,
    pub descricao: String,
    pub status: CaseStatus,
    pub data_abertura: NaiveDate,
    #[serde(default)]
    pub data_conclusao: Option<NaiveDate>,
}

#[async_trait]
impl TableRecord for ServiceTicket {
    type Create = CreateServiceTicket;

    const TABLE: Table = Table::Atendimento;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateServiceTicket,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ServiceTicket>(
            r#"
            INSERT INTO atendimento
                (id, associado_id, descricao, status, data_abertura, data_conclusao)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.associado_id)
        .bind(&data.descricao)
        .bind(&data.status)
        .bind(data.data_abertura)
        .bind(data.data_conclusao)
        .fetch_one(pool)
        .await
    }

    async fn update(conn: &mut SqliteConnection, record: &ServiceTicket) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE atendimento
            SET associado_id = $2,
                descricao = $3,
                status = $4,
                data_abertura = $5,
                data_conclusao = $6,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.associado_id)
        .bind(&record.descricao)
        .bind(&record.status)
        .bind(record.data_abertura)
        .bind(record.data_conclusao)
        .execute(conn)
        .await?;
        Ok(())
    }
}
