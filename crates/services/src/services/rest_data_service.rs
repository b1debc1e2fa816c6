//! PostgREST client for the hosted (Supabase) backend.

use async_trait::async_trait;
use db::models::table::{MANAGED_COLUMNS, SortDirection, Table};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::data_service::{DataService, DataServiceError, Record};

const REST_PATH: &str = "rest/v1/";

/// Data service speaking the PostgREST dialect used by Supabase.
///
/// Requests carry the project's anon key and, once a user is signed in, that
/// user's access token so row-level policies apply on the backend.
#[derive(Clone)]
pub struct RestDataService {
    http: Client,
    rest_url: Url,
    api_key: SecretString,
    access_token: Option<SecretString>,
}

impl RestDataService {
    pub fn new(base_url: &Url, api_key: SecretString) -> Result<Self, DataServiceError> {
        let http = Client::builder()
            .user_agent(concat!("ama-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            rest_url: service_url(base_url, REST_PATH).map_err(DataServiceError::Backend)?,
            api_key,
            access_token: None,
        })
    }

    /// A handle that authenticates as the given user. Clones share the HTTP pool.
    pub fn with_access_token(&self, access_token: Option<SecretString>) -> Self {
        Self {
            access_token,
            ..self.clone()
        }
    }

    fn table_url(&self, table: Table) -> Url {
        let mut url = self.rest_url.clone();
        url.set_path(&format!("{}{}", self.rest_url.path(), table.name()));
        url
    }

    pub fn read_all_url(&self, table: Table, order_by: &str, direction: SortDirection) -> Url {
        let mut url = self.table_url(table);
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair(
                "order",
                &format!("{}.{}", order_by, direction.as_postgrest()),
            );
        url
    }

    pub fn row_url(&self, table: Table, id: &str) -> Url {
        let mut url = self.table_url(table);
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .as_ref()
            .unwrap_or(&self.api_key)
            .expose_secret()
            .to_string();
        request
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DataServiceError> {
        let res = self.authorize(request).send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(DataServiceError::Backend(format!(
            "http {}: {}",
            status.as_u16(),
            error_message(&body)
        )))
    }
}

#[async_trait]
impl DataService for RestDataService {
    async fn read_all(
        &self,
        table: Table,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Record>, DataServiceError> {
        let url = self.read_all_url(table, order_by, direction);
        debug!(table = %table, url = %url, "GET rows");
        let res = self.send(self.http.get(url)).await?;
        Ok(res.json::<Vec<Record>>().await?)
    }

    async fn insert(&self, table: Table, record: Record) -> Result<(), DataServiceError> {
        let url = self.table_url(table);
        debug!(table = %table, "POST row");
        self.send(
            self.http
                .post(url)
                .header("Prefer", "return=minimal")
                .json(&[Value::Object(record)]),
        )
        .await?;
        Ok(())
    }

    async fn update_by_id(
        &self,
        table: Table,
        id: &str,
        mut record: Record,
    ) -> Result<(), DataServiceError> {
        for column in MANAGED_COLUMNS {
            record.remove(column);
        }
        let url = self.row_url(table, id);
        debug!(table = %table, id, "PATCH row");
        self.send(
            self.http
                .patch(url)
                .header("Prefer", "return=minimal")
                .json(&Value::Object(record)),
        )
        .await?;
        Ok(())
    }

    async fn delete_by_id(&self, table: Table, id: &str) -> Result<(), DataServiceError> {
        let url = self.row_url(table, id);
        debug!(table = %table, id, "DELETE row");
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

/// `{base}/{path}`, tolerating a base url with or without a trailing slash.
pub(crate) fn service_url(base_url: &Url, path: &str) -> Result<Url, String> {
    if base_url.cannot_be_a_base() {
        return Err(format!("backend url '{}' cannot be used as a base", base_url));
    }
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(path)
        .map_err(|e| format!("invalid backend url: {}", e))
}

/// PostgREST errors are JSON objects with a `message`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
