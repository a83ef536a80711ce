use std::path::Path;

use axum::{routing::get, Router};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

mod config;

use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let addr = settings.socket_addr()?;
    if !settings.index_file().is_file() {
        warn!(dist_dir = %settings.dist_dir.display(), "index.html not found; every route will 404");
    }

    let app = build_router(&settings.dist_dir);
    info!(%addr, dist_dir = %settings.dist_dir.display(), "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Static assets from `dist_dir`; `/` and unknown paths get `index.html`
/// so client-side routes resolve.
fn build_router(dist_dir: &Path) -> Router {
    let index = dist_dir.join("index.html");
    let assets = ServeDir::new(dist_dir).fallback(ServeFile::new(&index));

    Router::new()
        .route("/healthz", get(healthz))
        .route_service("/", ServeFile::new(&index))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
