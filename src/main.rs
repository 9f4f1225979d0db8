use std::sync::Arc;

use anyhow::Context;

use blipp_backend::config::Config;
use blipp_backend::{api, db, metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blipp_backend::init_tracing();
    metrics::register_metrics();

    let config = Config::load();
    let db = db::Database::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to initialize database at {}", config.database_url))?;
    tracing::info!("Using database {}", config.database_url);

    let app = api::router(Arc::new(db));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    tracing::info!("Blipp backend listening on {bind_addr}");
    tracing::info!("Dashboard at http://{bind_addr}/api/dashboard");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Blipp backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
