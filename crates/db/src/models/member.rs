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
#[sqlx(type_name = "associado_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Ativo,
    Inativo,
    Suspenso,
}

/// A member of the association (`associados`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Member {
    pub id: Uuid,
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub data_entrada: NaiveDate,
    pub instrumento: Option<String>,
    pub profissao: Option<String>,
    pub status: MemberStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateMember {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub data_entrada: NaiveDate,
    #[serde(default)]
    pub instrumento: Option<String>,
    #[serde(default)]
    pub profissao: Option<String>,
    #[serde(default)]
    pub status: Option<MemberStatus>,
}

#[async_trait]
impl TableRecord for Member {
    type Create = CreateMember;

    const TABLE: Table = Table::Associados;

    fn id(&self) -> Uuid {
        self.id
    }

    async fn create(pool: &SqlitePool, id: Uuid, data: &CreateMember) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO associados
                (id, nome, cpf, email, telefone, endereco, data_entrada, instrumento, profissao, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.nome)
        .bind(&data.cpf)
        .bind(&data.email)
        .bind(&data.telefone)
        .bind(&data.endereco)
        .bind(data.data_entrada)
        .bind(&data.instrumento)
        .bind(&data.profissao)
        .bind(data.status.clone().unwrap_or_default())
        .fetch_one(pool)
        .await
    }

    async fn update(conn: &mut SqliteConnection, record: &Member) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE associados
            SET nome = $2,
                cpf = $3,
                email = $4,
                telefone = $5,
                endereco = $6,
                data_entrada = $7,
                instrumento = $8,
                profissao = $9,
                status = $10,
                updated_at = datetime('now', 'subsec')
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.nome)
        .bind(&record.cpf)
        .bind(&record.email)
        .bind(&record.telefone)
        .bind(&record.endereco)
        .bind(record.data_entrada)
        .bind(&record.instrumento)
        .bind(&record.profissao)
        .bind(&record.status)
        .execute(conn)
        .await?;
        Ok(())
    }
}
