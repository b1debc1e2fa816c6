//! State of one entity list page: the displayed rows and the mutations that
//! refresh them.

use std::sync::Arc;

use db::models::table::SortDirection;
use tracing::{debug, error};

use super::{
    data_service::{DataService, Record, record_id},
    entity_form::EntityForm,
    entity_schema::EntitySchema,
};

const ORDER_BY: &str = "created_at";

pub struct EntityListPage {
    schema: &'static EntitySchema,
    service: Arc<dyn DataService>,
    rows: Vec<Record>,
    last_error: Option<String>,
}

impl EntityListPage {
    pub fn new(schema: &'static EntitySchema, service: Arc<dyn DataService>) -> Self {
        Self {
            schema,
            service,
            rows: Vec::new(),
            last_error: None,
        }
    }

    /// Build the page and run its initial load.
    pub async fn mount(schema: &'static EntitySchema, service: Arc<dyn DataService>) -> Self {
        let mut page = Self::new(schema, service);
        page.load().await;
        page
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Rows in display order, newest first.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Message of the most recent backend failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn find_row(&self, id: &str) -> Option<&Record> {
        self.rows
            .iter()
            .find(|row| record_id(row).as_deref() == Some(id))
    }

    /// Replace the rows with a fresh read. A failed read leaves the page empty.
    pub async fn load(&mut self) {
        let table = self.schema.table;
        match self
            .service
            .read_all(table, ORDER_BY, SortDirection::Descending)
            .await
        {
            Ok(rows) => {
                debug!(table = %table, count = rows.len(), "loaded rows");
                self.rows = rows;
            }
            Err(e) => {
                error!(table = %table, error = %e, "failed to load rows");
                self.rows.clear();
                self.last_error = Some(e.to_string());
            }
        }
    }

    pub async fn create(&mut self, payload: Record) {
        let table = self.schema.table;
        self.last_error = None;
        if let Err(e) = self.service.insert(table, payload).await {
            error!(table = %table, error = %e, "failed to create row");
            self.last_error = Some(e.to_string());
        }
        self.load().await;
    }

    /// Update the row named by the payload's `id`. Without an id nothing is
    /// sent and nothing is reloaded.
    pub async fn update(&mut self, payload: Record) {
        let table = self.schema.table;
        let Some(id) = record_id(&payload) else {
            debug!(table = %table, "update without id ignored");
            return;
        };
        self.last_error = None;
        if let Err(e) = self.service.update_by_id(table, &id, payload).await {
            error!(table = %table, id = %id, error = %e, "failed to update row");
            self.last_error = Some(e.to_string());
        }
        self.load().await;
    }

    pub async fn delete(&mut self, id: &str) {
        let table = self.schema.table;
        self.last_error = None;
        if let Err(e) = self.service.delete_by_id(table, id).await {
            error!(table = %table, id = %id, error = %e, "failed to delete row");
            self.last_error = Some(e.to_string());
        }
        self.load().await;
    }

    /// Submit the dialog: validate, then create or update depending on whether
    /// the form was opened from a row. The form stays open when invalid.
    pub async fn submit_form(&mut self, form: &mut EntityForm) -> bool {
        let Some(record) = form.prepare_submit() else {
            return false;
        };
        if form.is_edit() {
            self.update(record).await;
        } else {
            self.create(record).await;
        }
        form.close();
        true
    }
}

#[cfg(test)]
mod tests {
    use db::models::table::Table;
    use mockall::{Sequence, predicate::eq};
    use serde_json::{Value, json};

    use super::*;
    use crate::services::{
        data_service::{DataServiceError, MockDataService},
        entity_schema::{CONTRIBUTIONS, MEMBERS},
    };

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn failure() -> DataServiceError {
        DataServiceError::Backend("permission denied".to_string())
    }

    fn expect_reload(mock: &mut MockDataService, seq: &mut Sequence, rows: Vec<Record>) {
        mock.expect_read_all()
            .withf(|table, order_by, direction| {
                *table == Table::Associados
                    && order_by == "created_at"
                    && *direction == SortDirection::Descending
            })
            .times(1)
            .in_sequence(seq)
            .returning(move |_, _, _| Ok(rows.clone()));
    }

    #[tokio::test]
    async fn mount_loads_rows_newest_first() {
        let mut mock = MockDataService::new();
        let mut seq = Sequence::new();
        let rows = vec![
            record(json!({ "id": "2", "nome": "Bia" })),
            record(json!({ "id": "1", "nome": "Ana" })),
        ];
        expect_reload(&mut mock, &mut seq, rows.clone());

        let page = EntityListPage::mount(&MEMBERS, Arc::new(mock)).await;

        assert_eq!(page.rows(), rows.as_slice());
        assert_eq!(page.last_error(), None);
        assert_eq!(page.find_row("1").unwrap()["nome"], json!("Ana"));
    }

    #[tokio::test]
    async fn failed_load_shows_empty_list_and_error() {
        let mut mock = MockDataService::new();
        mock.expect_read_all()
            .times(1)
            .returning(|_, _, _| Err(failure()));

        let page = EntityListPage::mount(&CONTRIBUTIONS, Arc::new(mock)).await;

        assert!(page.rows().is_empty());
        assert_eq!(
            page.last_error(),
            Some("backend operation failed: permission denied")
        );
    }

    #[tokio::test]
    async fn create_inserts_then_reloads_once() {
        let mut mock = MockDataService::new();
        let mut seq = Sequence::new();
        let payload = record(json!({ "nome": "Ana" }));
        mock.expect_insert()
            .with(eq(Table::Associados), eq(payload.clone()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        expect_reload(&mut mock, &mut seq, vec![record(json!({ "id": "1", "nome": "Ana" }))]);

        let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));
        page.create(payload).await;

        assert_eq!(page.rows().len(), 1);
    }

    #[tokio::test]
    async fn failed_create_still_reloads_and_keeps_error() {
        let mut mock = MockDataService::new();
        let mut seq = Sequence::new();
        mock.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(failure()));
        expect_reload(&mut mock, &mut seq, vec![]);

        let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));
        page.create(record(json!({ "nome": "Ana" }))).await;

        assert_eq!(
            page.last_error(),
            Some("backend operation failed: permission denied")
        );
    }

    #[tokio::test]
    async fn update_without_id_never_reaches_backend() {
        let mut mock = MockDataService::new();
        mock.expect_update_by_id().never();
        mock.expect_read_all().never();

        let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));
        page.update(Record::new()).await;
        page.update(record(json!({ "id": "", "nome": "Ana" }))).await;

        assert_eq!(page.last_error(), None);
    }

    #[tokio::test]
    async fn update_targets_payload_id_then_reloads_once() {
        let mut mock = MockDataService::new();
        let mut seq = Sequence::new();
        mock.expect_update_by_id()
            .withf(|table, id, record| {
                *table == Table::Associados && id == "m-1" && record["nome"] == json!("Bia")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(failure()));
        expect_reload(&mut mock, &mut seq, vec![]);

        let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));
        page.update(record(json!({ "id": "m-1", "nome": "Bia" }))).await;

        assert!(page.last_error().is_some());
    }

    #[tokio::test]
    async fn delete_removes_by_id_then_reloads_regardless_of_outcome() {
        for outcome in [Ok(()), Err(failure())] {
            let mut mock = MockDataService::new();
            let mut seq = Sequence::new();
            mock.expect_delete_by_id()
                .withf(|table, id| *table == Table::Associados && id == "abc-123")
                .times(1)
                .in_sequence(&mut seq)
                .return_once(move |_, _| outcome);
            expect_reload(&mut mock, &mut seq, vec![]);

            let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));
            page.delete("abc-123").await;
        }
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() {
        let mut mock = MockDataService::new();
        mock.expect_insert().never();
        mock.expect_read_all().never();
        let mut form = EntityForm::opened(&MEMBERS, None);
        form.set_field("nome", "João");

        let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));

        assert!(!page.submit_form(&mut form).await);
        assert!(form.is_open());
    }

    #[tokio::test]
    async fn form_opened_from_row_submits_an_update() {
        let row = record(json!({
            "id": "m-1",
            "nome": "Ana",
            "cpf": "123",
            "email": "ana@ama.org",
            "telefone": "1",
            "endereco": "Rua B",
            "data_entrada": "2024-01-01",
            "status": "ativo",
        }));
        let mut mock = MockDataService::new();
        let mut seq = Sequence::new();
        mock.expect_insert().never();
        mock.expect_update_by_id()
            .withf(|_, id, record| id == "m-1" && record["nome"] == json!("Ana Maria"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        expect_reload(&mut mock, &mut seq, vec![]);
        let mut form = EntityForm::opened(&MEMBERS, Some(&row));
        form.set_field("nome", "Ana Maria");

        let mut page = EntityListPage::new(&MEMBERS, Arc::new(mock));

        assert!(page.submit_form(&mut form).await);
        assert!(!form.is_open());
    }
}
