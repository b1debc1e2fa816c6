//! Declarative description of each entity's form and list page.

use db::models::table::Table;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    /// One of a fixed list of options.
    Select { options: &'static [&'static str] },
}

impl FieldKind {
    /// `type` attribute of the matching HTML input.
    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select { .. } => "select",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub table: Table,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

const CASE_STATUS: &[&str] = &["em andamento", "concluído"];

pub static MEMBERS: EntitySchema = EntitySchema {
    table: Table::Associados,
    title: "Associados",
    description: "Cadastro de associados da AMA",
    fields: &[
        FieldSpec::required("nome", "Nome", FieldKind::Text),
        FieldSpec::required("cpf", "CPF", FieldKind::Text),
        FieldSpec::required("email", "E-mail", FieldKind::Text),
        FieldSpec::required("telefone", "Telefone", FieldKind::Text),
        FieldSpec::required("endereco", "Endereço", FieldKind::Text),
        FieldSpec::required("data_entrada", "Data de entrada", FieldKind::Date),
        FieldSpec::optional("instrumento", "Instrumento", FieldKind::Text),
        FieldSpec::optional("profissao", "Profissão", FieldKind::Text),
    ],
};

pub static CONTRIBUTIONS: EntitySchema = EntitySchema {
    table: Table::Contribuicoes,
    title: "Contribuições",
    description: "Mensalidades e contribuições dos associados",
    fields: &[
        FieldSpec::required("associado_id", "Associado", FieldKind::Text),
        FieldSpec::required("valor", "Valor", FieldKind::Number),
        FieldSpec::required("data_pagamento", "Data de pagamento", FieldKind::Date),
        FieldSpec::required(
            "status",
            "Status",
            FieldKind::Select {
                options: &["pago", "pendente"],
            },
        ),
        FieldSpec::optional("recibo_url", "Recibo (URL)", FieldKind::Text),
    ],
};

pub static FINANCE_ENTRIES: EntitySchema = EntitySchema {
    table: Table::Financeiro,
    title: "Financeiro",
    description: "Receitas e despesas da associação",
    fields: &[
        FieldSpec::required("descricao", "Descrição", FieldKind::Text),
        FieldSpec::required("valor", "Valor", FieldKind::Number),
        FieldSpec::required(
            "tipo",
            "Tipo",
            FieldKind::Select {
                options: &["receita", "despesa"],
            },
        ),
        FieldSpec::required("data", "Data", FieldKind::Date),
        FieldSpec::optional("categoria", "Categoria", FieldKind::Text),
    ],
};

pub static PARTNER_AGREEMENTS: EntitySchema = EntitySchema {
    table: Table::Convenios,
    title: "Convênios",
    description: "Parcerias e benefícios para associados",
    fields: &[
        FieldSpec::required("nome_parceiro", "Parceiro", FieldKind::Text),
        FieldSpec::required("descricao", "Descrição", FieldKind::Text),
        FieldSpec::required("data_inicio", "Início", FieldKind::Date),
        FieldSpec::required("data_fim", "Fim", FieldKind::Date),
        FieldSpec::optional("beneficios", "Benefícios", FieldKind::Text),
    ],
};

pub static LEGAL_DOCUMENTS: EntitySchema = EntitySchema {
    table: Table::Juridico,
    title: "Jurídico",
    description: "Processos e documentos jurídicos",
    fields: &[
        FieldSpec::required("processo_numero", "Número do processo", FieldKind::Text),
        FieldSpec::required("descricao", "Descrição", FieldKind::Text),
        FieldSpec::required(
            "status",
            "Status",
            FieldKind::Select {
                options: CASE_STATUS,
            },
        ),
        FieldSpec::required("data_abertura", "Data de abertura", FieldKind::Date),
    ],
};

pub static SERVICE_TICKETS: EntitySchema = EntitySchema {
    table: Table::Atendimento,
    title: "Atendimento",
    description: "Solicitações de atendimento dos associados",
    fields: &[
        FieldSpec::required("associado_id", "Associado", FieldKind::Text),
        FieldSpec::required("descricao", "Descrição", FieldKind::Text),
        FieldSpec::required(
            "status",
            "Status",
            FieldKind::Select {
                options: CASE_STATUS,
            },
        ),
        FieldSpec::required("data_abertura", "Data de abertura", FieldKind::Date),
        FieldSpec::optional("data_conclusao", "Data de conclusão", FieldKind::Date),
    ],
};

/// Every schema, in sidebar order.
pub static ALL: [&EntitySchema; 6] = [
    &MEMBERS,
    &FINANCE_ENTRIES,
    &CONTRIBUTIONS,
    &PARTNER_AGREEMENTS,
    &LEGAL_DOCUMENTS,
    &SERVICE_TICKETS,
];

impl EntitySchema {
    pub fn for_table(table: Table) -> &'static EntitySchema {
        match table {
            Table::Associados => &MEMBERS,
            Table::Contribuicoes => &CONTRIBUTIONS,
            Table::Financeiro => &FINANCE_ENTRIES,
            Table::Convenios => &PARTNER_AGREEMENTS,
            Table::Juridico => &LEGAL_DOCUMENTS,
            Table::Atendimento => &SERVICE_TICKETS,
        }
    }

    /// Look a schema up by its table name, as used in URLs.
    pub fn by_name(name: &str) -> Option<&'static EntitySchema> {
        name.parse::<Table>().ok().map(Self::for_table)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Path of the list page.
    pub fn path(&self) -> String {
        format!("/{}", self.table.name())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_table_has_a_schema() {
        for table in Table::iter() {
            assert_eq!(EntitySchema::for_table(table).table, table);
        }
        assert_eq!(ALL.len(), Table::iter().count());
    }

    #[test]
    fn schema_fields_are_table_columns() {
        for schema in ALL {
            for field in schema.fields {
                assert!(
                    schema.table.has_column(field.name),
                    "{} has no column {}",
                    schema.table,
                    field.name
                );
            }
        }
    }

    #[test]
    fn member_required_fields_match_form() {
        let required: Vec<_> = MEMBERS.required_fields().map(|f| f.name).collect();
        assert_eq!(
            required,
            ["nome", "cpf", "email", "telefone", "endereco", "data_entrada"]
        );
    }

    #[test]
    fn contribution_status_offers_paid_and_pending() {
        let status = CONTRIBUTIONS.field("status").unwrap();
        assert_eq!(
            status.kind,
            FieldKind::Select {
                options: &["pago", "pendente"]
            }
        );
    }

    #[test]
    fn by_name_resolves_url_segments() {
        assert_eq!(EntitySchema::by_name("juridico"), Some(&LEGAL_DOCUMENTS));
        assert_eq!(EntitySchema::by_name("profiles"), None);
        assert_eq!(MEMBERS.path(), "/associados");
    }
}
