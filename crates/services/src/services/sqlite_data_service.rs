//! Data service backed by the embedded SQLite database.

use async_trait::async_trait;
use db::{
    DBService,
    models::{
        contribution::Contribution,
        finance_entry::FinanceEntry,
        legal_document::LegalDocument,
        member::Member,
        partner_agreement::PartnerAgreement,
        record::TableRecord,
        service_ticket::ServiceTicket,
        table::{MANAGED_COLUMNS, SortDirection, Table},
    },
};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::data_service::{DataService, DataServiceError, Record};

/// Runs `$body` with `$R` bound to the row type stored in `$table`.
macro_rules! with_record_type {
    ($table:expr, $R:ident => $body:expr) => {
        match $table {
            Table::Associados => {
                type $R = Member;
                $body
            }
            Table::Contribuicoes => {
                type $R = Contribution;
                $body
            }
            Table::Financeiro => {
                type $R = FinanceEntry;
                $body
            }
            Table::Convenios => {
                type $R = PartnerAgreement;
                $body
            }
            Table::Juridico => {
                type $R = LegalDocument;
                $body
            }
            Table::Atendimento => {
                type $R = ServiceTicket;
                $body
            }
        }
    };
}

#[derive(Clone)]
pub struct SqliteDataService {
    db: DBService,
}

impl SqliteDataService {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    async fn read_rows<R: TableRecord>(
        &self,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Record>, DataServiceError> {
        let rows = R::find_all(&self.db.pool, order_by, direction).await?;
        rows.iter().map(to_record).collect()
    }

    async fn insert_row<R: TableRecord>(&self, record: Record) -> Result<(), DataServiceError> {
        let payload = writable_columns(R::TABLE, record)?;
        let data: R::Create = serde_json::from_value(Value::Object(payload))?;
        let row = R::create(&self.db.pool, Uuid::new_v4(), &data).await?;
        debug!(table = %R::TABLE, id = %row.id(), "Inserted row");
        Ok(())
    }

    /// Merge `patch` into the stored row and write it back in one transaction.
    /// An id that matches no row is not an error.
    async fn update_row<R: TableRecord>(
        &self,
        id: Uuid,
        patch: Record,
    ) -> Result<(), DataServiceError> {
        let patch = writable_columns(R::TABLE, patch)?;
        let mut tx = self.db.pool.begin().await?;

        let Some(current) = R::find_by_id(&mut *tx, id).await? else {
            debug!(table = %R::TABLE, id = %id, "Update matched no rows");
            return Ok(());
        };

        let mut merged = to_record(&current)?;
        merged.extend(patch);
        let updated: R = serde_json::from_value(Value::Object(merged))?;

        R::update(&mut *tx, &updated).await?;
        tx.commit().await?;
        debug!(table = %R::TABLE, id = %id, "Updated row");
        Ok(())
    }

    async fn delete_row<R: TableRecord>(&self, id: Uuid) -> Result<(), DataServiceError> {
        let removed = R::delete(&self.db.pool, id).await?;
        debug!(table = %R::TABLE, id = %id, removed, "Deleted row");
        Ok(())
    }
}

#[async_trait]
impl DataService for SqliteDataService {
    async fn read_all(
        &self,
        table: Table,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Record>, DataServiceError> {
        with_record_type!(table, R => self.read_rows::<R>(order_by, direction).await)
    }

    async fn insert(&self, table: Table, record: Record) -> Result<(), DataServiceError> {
        with_record_type!(table, R => self.insert_row::<R>(record).await)
    }

    async fn update_by_id(
        &self,
        table: Table,
        id: &str,
        record: Record,
    ) -> Result<(), DataServiceError> {
        let id = parse_id(id)?;
        with_record_type!(table, R => self.update_row::<R>(id, record).await)
    }

    async fn delete_by_id(&self, table: Table, id: &str) -> Result<(), DataServiceError> {
        let id = parse_id(id)?;
        with_record_type!(table, R => self.delete_row::<R>(id).await)
    }
}

fn parse_id(id: &str) -> Result<Uuid, DataServiceError> {
    Uuid::parse_str(id.trim())
        .map_err(|e| DataServiceError::Backend(format!("invalid id '{}': {}", id, e)))
}

fn to_record<R: TableRecord>(row: &R) -> Result<Record, DataServiceError> {
    match serde_json::to_value(row)? {
        Value::Object(map) => Ok(map),
        other => Err(DataServiceError::Backend(format!(
            "row of {} did not serialize to an object: {}",
            R::TABLE,
            other
        ))),
    }
}

/// Drop backend-managed columns and reject columns the table does not have.
fn writable_columns(table: Table, record: Record) -> Result<Record, DataServiceError> {
    let mut writable = Record::new();
    for (column, value) in record {
        if MANAGED_COLUMNS.contains(&column.as_str()) {
            continue;
        }
        if !table.has_column(&column) {
            return Err(DataServiceError::Backend(format!(
                "column '{}' does not exist on table '{}'",
                column, table
            )));
        }
        writable.insert(column, value);
    }
    Ok(writable)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    async fn service() -> SqliteDataService {
        SqliteDataService::new(DBService::new_in_memory().await.unwrap())
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn member(nome: &str) -> Record {
        record(json!({
            "nome": nome,
            "cpf": "123",
            "email": "ana@ama.org",
            "telefone": "(63) 99999-0000",
            "endereco": "Rua A, 1",
            "data_entrada": "2024-03-01",
            "instrumento": null,
        }))
    }

    async fn all_members(service: &SqliteDataService) -> Vec<Record> {
        service
            .read_all(Table::Associados, "created_at", SortDirection::Descending)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_generates_id_and_timestamps() {
        let service = service().await;

        service.insert(Table::Associados, member("Ana")).await.unwrap();

        let rows = all_members(&service).await;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!(Uuid::parse_str(row["id"].as_str().unwrap()).is_ok());
        assert!(row["created_at"].is_string());
        assert_eq!(row["status"], json!("ativo"));
        assert_eq!(row["nome"], json!("Ana"));
    }

    #[tokio::test]
    async fn insert_ignores_client_supplied_id() {
        let service = service().await;
        let mut payload = member("Ana");
        payload.insert("id".into(), json!("not-a-uuid"));

        service.insert(Table::Associados, payload).await.unwrap();

        let rows = all_members(&service).await;
        assert_ne!(rows[0]["id"], json!("not-a-uuid"));
    }

    #[tokio::test]
    async fn insert_rejects_missing_required_column() {
        let service = service().await;
        let mut payload = member("Ana");
        payload.remove("cpf");

        let err = service.insert(Table::Associados, payload).await.unwrap_err();

        assert!(err.to_string().contains("cpf"));
    }

    #[tokio::test]
    async fn insert_rejects_unknown_column() {
        let service = service().await;
        let mut payload = member("Ana");
        payload.insert("apelido".into(), json!("Aninha"));

        let err = service.insert(Table::Associados, payload).await.unwrap_err();

        assert!(err.to_string().contains("apelido"));
    }

    #[tokio::test]
    async fn update_merges_partial_record() {
        let service = service().await;
        service.insert(Table::Associados, member("Ana")).await.unwrap();
        let id = all_members(&service).await[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        service
            .update_by_id(
                Table::Associados,
                &id,
                record(json!({ "id": id, "telefone": "(63) 98888-1111", "status": "suspenso" })),
            )
            .await
            .unwrap();

        let row = &all_members(&service).await[0];
        assert_eq!(row["telefone"], json!("(63) 98888-1111"));
        assert_eq!(row["status"], json!("suspenso"));
        assert_eq!(row["nome"], json!("Ana"));
        assert_eq!(row["id"], json!(id));
    }

    #[tokio::test]
    async fn update_with_invalid_value_leaves_row_untouched() {
        let service = service().await;
        service.insert(Table::Associados, member("Ana")).await.unwrap();
        let id = all_members(&service).await[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let result = service
            .update_by_id(
                Table::Associados,
                &id,
                record(json!({ "data_entrada": "not a date" })),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(all_members(&service).await[0]["data_entrada"], json!("2024-03-01"));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_an_error() {
        let service = service().await;

        let result = service
            .update_by_id(
                Table::Associados,
                &Uuid::new_v4().to_string(),
                record(json!({ "nome": "Ninguém" })),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_row_and_tolerates_unknown_id() {
        let service = service().await;
        service.insert(Table::Associados, member("Ana")).await.unwrap();
        let id = all_members(&service).await[0]["id"]
            .as_str()
            .unwrap()
            .to_string();

        service.delete_by_id(Table::Associados, &id).await.unwrap();
        service.delete_by_id(Table::Associados, &id).await.unwrap();

        assert!(all_members(&service).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_id_is_a_backend_error() {
        let service = service().await;

        let err = service
            .delete_by_id(Table::Associados, "abc-123")
            .await
            .unwrap_err();

        assert!(matches!(err, DataServiceError::Backend(msg) if msg.contains("abc-123")));
    }

    #[tokio::test]
    async fn read_all_rejects_unknown_order_column() {
        let service = service().await;

        let result = service
            .read_all(Table::Financeiro, "valor desc; --", SortDirection::Ascending)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn numbers_and_selects_reach_typed_columns() {
        let service = service().await;

        service
            .insert(
                Table::Financeiro,
                record(json!({
                    "descricao": "Aluguel da sede",
                    "valor": 900.0,
                    "tipo": "despesa",
                    "data": "2024-04-05",
                    "categoria": null,
                })),
            )
            .await
            .unwrap();

        let rows = service
            .read_all(Table::Financeiro, "created_at", SortDirection::Descending)
            .await
            .unwrap();
        assert_eq!(rows[0]["valor"], json!(900.0));
        assert_eq!(rows[0]["tipo"], json!("despesa"));
    }
}
