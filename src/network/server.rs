//! HTTP Server
//!
//! Binds the listen address and serves the router until shutdown.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{Result, StrataError};

use super::router;

/// HTTP server for StrataKV
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
}

impl Server {
    /// Create a new server with the given config and engine
    pub fn new(config: Config, engine: Arc<Engine>) -> Self {
        Self { config, engine }
    }

    /// Router serving this server's engine
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.engine))
    }

    /// Serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("could not listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        })
        .await
    }

    /// Serve until `shutdown` resolves, then sync the WAL
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.config.listen_addr)
            .await
            .map_err(|e| {
                StrataError::Network(format!("bind {} failed: {}", self.config.listen_addr, e))
            })?;

        tracing::info!("listening on {}", self.config.listen_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| StrataError::Network(format!("server error: {}", e)))?;

        self.engine.sync()
    }
}
