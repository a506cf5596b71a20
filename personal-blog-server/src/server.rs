use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::limits::apply_limits;
use crate::presentation::http::middleware::trace::apply_trace;
use crate::presentation::{AppState, http};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(settings, state)?;

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

pub(crate) fn build_router(settings: &Settings, state: AppState) -> anyhow::Result<Router> {
    let app = http::routes(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    apply_cors(app, &settings.cors_origins)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
