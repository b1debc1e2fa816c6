//! Wiring of the configured data and auth backends.

use std::sync::Arc;

use db::DBService;
use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

use super::{
    auth::{AuthError, AuthProvider, OperatorAuthProvider, SupabaseAuthProvider},
    config::BackendConfig,
    data_service::{DataService, DataServiceError},
    rest_data_service::RestDataService,
    sqlite_data_service::SqliteDataService,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    DataService(#[from] DataServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Clone)]
enum Store {
    Sqlite(Arc<SqliteDataService>),
    Rest(RestDataService),
}

/// Data store plus the matching sign-in provider.
#[derive(Clone)]
pub struct Backend {
    store: Store,
    auth: Arc<dyn AuthProvider>,
}

impl Backend {
    pub async fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        match config {
            BackendConfig::Sqlite {
                database_url,
                operator,
            } => {
                let db = DBService::new(database_url).await?;
                Ok(Self::sqlite(
                    db,
                    OperatorAuthProvider::new(operator.email.clone(), operator.password.clone()),
                ))
            }
            BackendConfig::Supabase { url, anon_key } => {
                info!(url = %url, "using hosted backend");
                Ok(Self {
                    store: Store::Rest(RestDataService::new(url, anon_key.clone())?),
                    auth: Arc::new(SupabaseAuthProvider::new(url, anon_key.clone())?),
                })
            }
        }
    }

    /// A SQLite store guarded by a single operator account.
    pub fn sqlite(db: DBService, operator: OperatorAuthProvider) -> Self {
        Self {
            store: Store::Sqlite(Arc::new(SqliteDataService::new(db))),
            auth: Arc::new(operator),
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthProvider> {
        self.auth.clone()
    }

    /// Data service acting for the session holding `access_token`.
    pub fn data_service(&self, access_token: Option<SecretString>) -> Arc<dyn DataService> {
        match &self.store {
            Store::Sqlite(service) => service.clone(),
            Store::Rest(service) => Arc::new(service.with_access_token(access_token)),
        }
    }
}
