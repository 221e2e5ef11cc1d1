//! Service entry point: environment configuration, tracing, optional
//! database hydration, then serve.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use outreach_api::{app, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig {
        port: std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080),
        upload_dir: std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads/photos")),
    };

    let db_pool = outreach_api::db::init_pool().await?;
    let state = AppState::with_config(config.clone(), db_pool);
    state.hydrate_from_db().await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, upload_dir = %config.upload_dir.display(), "listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
