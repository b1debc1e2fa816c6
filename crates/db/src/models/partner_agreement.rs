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
#[sqlx(type_name = "convenio_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgreementStatus {
    #[default]
    Ativo,
    Encerrado,
}

/// An agreement with a partner business (`convenios`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PartnerAgreement {
    pub id: Uuid,
    pub nome_parceiro: String,
    pub descricao: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub beneficios: Option<String>,
    pub status: AgreementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreatePartnerAgreement {
    pub nome_parceiro: String,
    pub descricao: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    #[serde(default)]
    pub beneficios: Option<String>,
    #[serde(default)]
    pub status: Option<AgreementStatus>,
}

#[async_trait]
impl TableRecord for PartnerAgreement {
    type Create = CreatePartnerAgreement;

    const TABLE: Table = Table::Convenios;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreatePartnerAgreement,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PartnerAgreement>(
            r#"
            INSERT INTO convenios
                (id, nome_parceiro, descricao, data_inicio, data_fim, beneficios, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.nome_parceiro)
        .bind(&data.descricao)
        .bind(data.data_inicio)
        .bind(data.data_fim)
        .bind(&data.beneficios)
        .bind(data.status.clone().unwrap_or_default())
        .fetch_one(pool)
        .await
    }

    async fn update(
        conn: &mut SqliteConnection,
        record: &PartnerAgreement,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE convenios
            SET nome_parceiro = $2,
                descricao = $3,
                data_inicio = $4,
                data_fim = $5,
                beneficios = $6,
                status = $7,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.nome_parceiro)
        .bind(&record.descricao)
        .bind(record.data_inicio)
        .bind(record.data_fim)
        .bind(&record.beneficios)
        .bind(&record.status)
        .execute(conn)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn new_agreements_start_active_and_can_be_closed() {
        let db = DBService::new_in_memory().await.unwrap();
        let created = PartnerAgreement::create(
            &db.pool,
            Uuid::new_v4(),
            &CreatePartnerAgreement {
                nome_parceiro: "Loja do Músico".to_string(),
                descricao: "Desconto em instrumentos".to_string(),
                data_inicio: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                data_fim: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                beneficios: Some("10% de desconto".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(created.status, AgreementStatus::Ativo);

        let closed = PartnerAgreement {
            status: AgreementStatus::Encerrado,
            ..created.clone()
        };
        let mut conn = db.pool.acquire().await.unwrap();
        PartnerAgreement::update(&mut conn, &closed).await.unwrap();

        let stored = PartnerAgreement::find_by_id(&mut conn, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, AgreementStatus::Encerrado);
        assert_eq!(stored.data_fim, created.data_fim);
    }
}
