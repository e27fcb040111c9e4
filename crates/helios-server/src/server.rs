//! HTTP server lifecycle.
//!
//! Binds the TCP listener, serves the router, and drains on `Ctrl-C`.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Errors that can occur while starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the listen address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server hit a fatal I/O error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Bind `host:port` and serve `router` until shutdown.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] when the address is invalid or the
/// listener cannot bind, [`ServerError::Serve`] on a fatal serve error.
pub async fn start_server(host: &str, port: u16, router: Router) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "helios server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    // Ctrl-C failing to register would leave no way to stop cleanly;
    // fall back to pending forever and let the process be killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
