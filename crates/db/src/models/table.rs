use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

/// Backend tables managed by the console, one per entity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Table {
    Associados,
    Contribuicoes,
    Financeiro,
    Convenios,
    Juridico,
    Atendimento,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Associados => "associados",
            Table::Contribuicoes => "contribuicoes",
            Table::Financeiro => "financeiro",
            Table::Convenios => "convenios",
            Table::Juridico => "juridico",
            Table::Atendimento => "atendimento",
        }
    }

    /// Every column of the table, in schema order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Associados => &[
                "id",
                "nome",
                "cpf",
                "email",
                "telefone",
                "endereco",
                "data_entrada",
                "instrumento",
                "profissao",
                "status",
                "created_at",
                "updated_at",
            ],
            Table::Contribuicoes => &[
                "id",
                "associado_id",
                "valor",
                "data_pagamento",
                "status",
                "recibo_url",
                "created_at",
                "updated_at",
            ],
            Table::Financeiro => &[
                "id",
                "descricao",
                "valor",
                "tipo",
                "data",
                "categoria",
                "created_at",
                "updated_at",
            ],
            Table::Convenios => &[
                "id",
                "nome_parceiro",
                "descricao",
                "data_inicio",
                "data_fim",
                "beneficios",
                "status",
                "created_at",
                "updated_at",
            ],
            Table::Juridico => &[
                "id",
                "processo_numero",
                "descricao",
                "status",
                "data_abertura",
                "created_at",
                "updated_at",
            ],
            Table::Atendimento => &[
                "id",
                "associado_id",
                "descricao",
                "status",
                "data_abertura",
                "data_conclusao",
                "created_at",
                "updated_at",
            ],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

/// Columns the backend owns; never written from a client payload.
pub const MANAGED_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    /// PostgREST spelling, as in `order=created_at.desc`.
    pub fn as_postgrest(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}
