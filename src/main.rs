use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use study_assistant::build_response_service;
use study_assistant::config::Config;
use study_assistant::controller::Controller;
use study_assistant::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    let service = build_response_service(&config);
    let controller = Arc::new(Controller::new(service));

    let bind: SocketAddr = config.server.bind.parse().map_err(|e| {
        anyhow::anyhow!("Invalid bind address {} (expected host:port): {e}", config.server.bind)
    })?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        name = %config.server.name,
        simulated = config.simulated.enabled,
        "Starting study assistant HTTP server"
    );

    axum::serve(listener, web::router(controller)).await?;
    Ok(())
}
