//! Runtime configuration read from the environment.

use std::net::SocketAddr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://ama.db?mode=rwc";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct OperatorCredentials {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub enum BackendConfig {
    Sqlite {
        database_url: String,
        operator: OperatorCredentials,
    },
    Supabase {
        url: Url,
        anon_key: SecretString,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub backend: BackendConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let bind = get("AMA_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: "AMA_BIND",
                reason: e.to_string(),
            })?;

        let backend = match get("AMA_BACKEND").as_deref().map(str::trim) {
            None | Some("sqlite") => BackendConfig::Sqlite {
                database_url: get("DATABASE_URL")
                    .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                operator: OperatorCredentials {
                    email: require("AMA_OPERATOR_EMAIL")?.trim().to_string(),
                    password: SecretString::from(require("AMA_OPERATOR_PASSWORD")?),
                },
            },
            Some("supabase") => BackendConfig::Supabase {
                url: Url::parse(&require("SUPABASE_URL")?).map_err(|e| {
                    ConfigError::Invalid {
                        name: "SUPABASE_URL",
                        reason: e.to_string(),
                    }
                })?,
                anon_key: SecretString::from(require("SUPABASE_ANON_KEY")?),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "AMA_BACKEND",
                    reason: format!("expected 'sqlite' or 'supabase', got '{}'", other),
                });
            }
        };

        Ok(Self { bind, backend })
    }
}
