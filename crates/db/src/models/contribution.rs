use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::{record::TableRecord, table::Table};

#[derive(
    Debug, Clone, Type, Serialize, Deserialize, PartialEq, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "contribuicao_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContributionStatus {
    Pago,
    #[default]
    Pendente,
    Atrasado,
}

/// A membership fee payment (`contribuicoes`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Contribution {
    pub id: Uuid,
    pub associado_id: Uuid, // Foreign key to Member
    pub valor: f64,
    pub data_pagamento: NaiveDate,
    pub status: ContributionStatus,
    pub recibo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateContribution {
    pub associado_id: Uuid,
    pub valor: f64,
    pub data_pagamento: NaiveDate,
    #[serde(default)]
    pub status: Option<ContributionStatus>,
    #[serde(default)]
    pub recibo_url: Option<String>,
}

#[async_trait]
impl TableRecord for Contribution {
    type Create = CreateContribution;

    const TABLE: Table = Table::Contribuicoes;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateContribution,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Contribution>(
            r#"
            INSERT INTO contribuicoes (id, associado_id, valor, data_pagamento, status, recibo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.associado_id)
        .bind(data.valor)
        .bind(data.data_pagamento)
        .bind(data.status.clone().unwrap_or_default())
        .bind(&data.recibo_url)
        .fetch_one(pool)
        .await
    }

    async fn update(conn: &mut SqliteConnection, record: &Contribution) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE contribuicoes
            SET associado_id = $2,
                valor = $3,
                data_pagamento = $4,
                status = $5,
                recibo_url = $6,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.associado_id)
        .bind(record.valor)
        .bind(record.data_pagamento)
        .bind(&record.status)
        .bind(&record.recibo_url)
        .execute(conn)
        .await?;
        Ok(())
    }
}
