use anyhow::{Context, Result};

use tripcal_core::config::ServiceConfig;
use tripcal_server::{AppState, app, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServiceConfig::load().context("Failed to load configuration")?;
    let addr = format!("{}:{}", config.host, config.port);

    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("tripcal-server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
