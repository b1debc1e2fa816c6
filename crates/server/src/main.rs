use anyhow::Context;
use server::{AppState, app};
use services::services::{backend::Backend, config::Config};
use tracing_subscriber::{EnvFilter, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let backend = Backend::connect(&config.backend)
        .await
        .context("failed to connect to backend")?;
    let state = AppState::new(backend).context("failed to load templates")?;

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("AMA console listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
