//! HTML rendering of the console pages.

use serde::Serialize;
use services::services::{
    dashboard::Dashboard,
    data_service::{Record, record_id},
    entity_form::EntityForm,
    entity_list::EntityListPage,
    entity_schema::{ALL, FieldKind},
    session::Identity,
};
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 4] = [
    ("layout.html", include_str!("../templates/layout.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("entity_list.html", include_str!("../templates/entity_list.html")),
];

#[derive(Debug, Serialize)]
struct NavItem {
    title: &'static str,
    /// Path without the leading slash; empty for the dashboard.
    slug: &'static str,
    active: bool,
}

#[derive(Debug, Serialize)]
struct RowView {
    id: Option<String>,
    /// The whole record, pretty-printed.
    raw: String,
}

#[derive(Debug, Serialize)]
struct FieldView {
    name: &'static str,
    label: &'static str,
    input_type: &'static str,
    required: bool,
    options: &'static [&'static str],
    value: String,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct FormView {
    title: String,
    record_id: Option<String>,
    fields: Vec<FieldView>,
}

/// Compiled page templates.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    pub fn login(&self, email: &str, error: Option<&str>) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("email", email);
        context.insert("error", &error);
        self.tera.render("login.html", &context)
    }

    pub fn dashboard(&self, identity: &Identity, dashboard: &Dashboard) -> Result<String, tera::Error> {
        let mut context = shell("Dashboard", "/", identity);
        context.insert("dashboard", dashboard);
        self.tera.render("dashboard.html", &context)
    }

    /// The list page, with the form dialog when `form` is open.
    pub fn entity_list(
        &self,
        identity: &Identity,
        page: &EntityListPage,
        form: Option<&EntityForm>,
    ) -> Result<String, tera::Error> {
        let schema = page.schema();
        let mut context = shell(schema.title, &schema.path(), identity);
        context.insert("schema", schema);
        context.insert("rows", &rows(page.rows())?);
        context.insert("error", &page.last_error());
        context.insert("form", &form.filter(|f| f.is_open()).map(form_view));
        self.tera.render("entity_list.html", &context)
    }
}

fn shell(title: &str, active_path: &str, identity: &Identity) -> Context {
    let mut nav = vec![NavItem {
        title: "Dashboard",
        slug: "",
        active: active_path == "/",
    }];
    nav.extend(ALL.iter().map(|schema| NavItem {
        title: schema.title,
        slug: schema.table.name(),
        active: schema.path() == active_path,
    }));

    let mut context = Context::new();
    context.insert("title", title);
    context.insert("nav", &nav);
    context.insert("identity", identity);
    context
}

fn rows(rows: &[Record]) -> Result<Vec<RowView>, tera::Error> {
    rows.iter()
        .map(|row| {
            Ok(RowView {
                id: record_id(row),
                raw: serde_json::to_string_pretty(row)
                    .map_err(|e| tera::Error::msg(format!("cannot serialize row: {e}")))?,
            })
        })
        .collect()
}

fn form_view(form: &EntityForm) -> FormView {
    let schema = form.schema();
    let title = if form.is_edit() {
        format!("Editar {}", schema.title)
    } else {
        format!("Novo registro em {}", schema.title)
    };
    FormView {
        title,
        record_id: form.record_id().map(str::to_string),
        fields: schema
            .fields
            .iter()
            .map(|field| FieldView {
                name: field.name,
                label: field.label,
                input_type: field.kind.input_type(),
                required: field.required,
                options: match field.kind {
                    FieldKind::Select { options } => options,
                    _ => &[],
                },
                value: form.value(field.name).to_string(),
                error: form.error(field.name).map(str::to_string),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use db::models::table::{SortDirection, Table};
    use serde_json::json;
    use services::services::{
        data_service::{DataService, DataServiceError},
        entity_schema::{LEGAL_DOCUMENTS, MEMBERS},
    };

    use super::*;

    struct Fixed(Vec<Record>);

    #[async_trait]
    impl DataService for Fixed {
        async fn read_all(
            &self,
            _: Table,
            _: &str,
            _: SortDirection,
        ) -> Result<Vec<Record>, DataServiceError> {
            Ok(self.0.clone())
        }

        async fn insert(&self, _: Table, _: Record) -> Result<(), DataServiceError> {
            Ok(())
        }

        async fn update_by_id(&self, _: Table, _: &str, _: Record) -> Result<(), DataServiceError> {
            Ok(())
        }

        async fn delete_by_id(&self, _: Table, _: &str) -> Result<(), DataServiceError> {
            Ok(())
        }
    }

    fn identity() -> Identity {
        Identity {
            email: "admin@ama.org".to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn list_page_renders_rows_and_escapes_values() {
        let row = json!({
            "id": "m-1",
            "nome": "<b>Ana</b>",
            "cpf": "123",
            "instrumento": null,
            "status": "ativo",
            "created_at": "2024-03-01T10:00:00",
        });
        let page = EntityListPage::mount(
            &MEMBERS,
            Arc::new(Fixed(vec![row.as_object().cloned().unwrap()])),
        )
        .await;

        let html = Templates::new()
            .unwrap()
            .entity_list(&identity(), &page, None)
            .unwrap();

        assert!(html.contains("&lt;b&gt;Ana&lt;&#x2F;b&gt;"));
        assert!(html.contains("<pre>"));
        assert!(html.contains("&quot;status&quot;: &quot;ativo&quot;"));
        assert!(html.contains("&quot;instrumento&quot;: null"));
        assert!(html.contains("created_at"));
        assert!(html.contains("/associados/m-1/edit"));
        assert!(html.contains("admin@ama.org"));
        assert!(!html.contains("<dialog"));
    }

    #[tokio::test]
    async fn form_dialog_shows_options_and_errors() {
        let page = EntityListPage::mount(&LEGAL_DOCUMENTS, Arc::new(Fixed(vec![]))).await;
        let mut form = EntityForm::opened(&LEGAL_DOCUMENTS, None);
        form.validate();

        let html = Templates::new()
            .unwrap()
            .entity_list(&identity(), &page, Some(&form))
            .unwrap();

        assert!(html.contains("<dialog"));
        assert!(html.contains("em andamento"));
        assert!(html.contains("Required"));
        assert!(html.contains(r#"action="/juridico""#));
    }

    #[tokio::test]
    async fn form_dialog_clears_field_errors_on_change() {
        let page = EntityListPage::mount(&LEGAL_DOCUMENTS, Arc::new(Fixed(vec![]))).await;
        let mut form = EntityForm::opened(&LEGAL_DOCUMENTS, None);
        form.validate();

        let html = Templates::new()
            .unwrap()
            .entity_list(&identity(), &page, Some(&form))
            .unwrap();

        assert!(html.contains(r#"data-error-for="processo_numero" class="field-error""#));
        assert!(html.contains(r#"form.addEventListener("input", clearFieldError)"#));
        assert!(html.contains(r#"form.addEventListener("change", clearFieldError)"#));
        assert!(html.contains("el.dataset.errorFor === name"));
    }

    #[tokio::test]
    async fn closed_form_has_no_error_script() {
        let page = EntityListPage::mount(&LEGAL_DOCUMENTS, Arc::new(Fixed(vec![]))).await;

        let html = Templates::new()
            .unwrap()
            .entity_list(&identity(), &page, None)
            .unwrap();

        assert!(!html.contains("clearFieldError"));
    }

    #[test]
    fn dashboard_renders_stat_cards() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();

        let html = Templates::new()
            .unwrap()
            .dashboard(&identity(), &Dashboard::new(now))
            .unwrap();

        assert!(html.contains("Total de Associados"));
        assert!(html.contains("Bem-vindo ao AMA"));
        assert!(html.contains("trend-neutral"));
    }
}
