// Gateway module for the HTTP server - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod errors;
mod routes;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::gateway::Gateway;

// Public re-exports - the ONLY way to access server functionality
pub use errors::status_for;
pub use routes::router;

/// Serve the gateway on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, gateway: Arc<Gateway>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(
        "Gateway listening on http://{} (default model: {})",
        addr,
        gateway.default_model()
    );

    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Gateway stopped");
    Ok(())
}

/// Bind the configured address and serve
pub async fn run(bind_address: &str, gateway: Arc<Gateway>) -> Result<()> {
    let listener = TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    serve(listener, gateway).await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C, running until killed: {}", e);
            std::future::pending::<()>().await
        }
    }
}
