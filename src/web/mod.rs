//! Flight, vibe and bundle dashboards served with axum.

pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod templates;

pub use router::app_router;
pub use state::{AppState, DashboardKind};

use crate::error::Result;
use tracing::info;

/// Binds `host:port` and serves the dashboard until the process exits.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let kind = state.kind;
    let app = app_router(state);
    let bind_addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!(dashboard = kind.label(), "Dashboard listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
