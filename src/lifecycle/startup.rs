//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Bind the listener and begin serving
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when the router compiled)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Build the server and bind its listener without serving yet.
pub async fn prepare(config: AppConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;

    Ok((server, listener))
}

/// Start the server and run until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let (server, listener) = prepare(config).await?;
    server.run(listener, shutdown.subscribe()).await?;

    if !shutdown.is_triggered() {
        tracing::warn!("HTTP server exited before shutdown was requested");
    }
    tracing::info!(
        remaining_subscribers = shutdown.receiver_count(),
        "Shutdown complete"
    );
    Ok(())
}
