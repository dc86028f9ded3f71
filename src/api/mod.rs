//! Read-only status API.
//!
//! # Routes
//! - `GET /health`: process liveness
//! - `GET /status`: every target plus the aggregate
//! - `GET /targets`, `GET /targets/{identifier}`
//! - `GET /aggregate`: 404 while aggregation is disabled

pub mod handlers;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::health::StatusBoard;
use self::handlers::*;

pub fn router(board: StatusBoard) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/status", get(get_status))
        .route("/targets", get(get_targets))
        .route("/targets/{identifier}", get(get_target))
        .route("/aggregate", get(get_aggregate))
        .layer(TraceLayer::new_for_http())
        .with_state(board)
}

/// Serve the API on `listener` until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    board: StatusBoard,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Status API listening");

    axum::serve(listener, router(board))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Status API stopped");
    Ok(())
}
