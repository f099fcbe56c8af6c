//! Composition root: builds the node client and renderer, assembles the
//! router and serves it until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use rollbook_core::{Config, NodeClient, PdfReportRenderer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::{api, state::AppState};

pub async fn run(config: Config) -> Result<()> {
    let node = NodeClient::new(config.node).context("Failed to build node client")?;
    let state = AppState::new(Arc::new(node), Arc::new(PdfReportRenderer::new()));

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api::v1::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
