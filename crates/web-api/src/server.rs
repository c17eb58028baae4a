use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use nifty_relay_core::RelayEngine;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    engine: Arc<RelayEngine>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(engine: Arc<RelayEngine>) -> Self {
        Self { engine }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::home))
            .route("/webhook", post(handlers::webhook))
            .route("/postback", post(handlers::postback))
            .route("/status", get(handlers::status))
            .layer(TraceLayer::new_for_http())
            .with_state(self.engine.clone())
    }

    /// Starts the web server listening on the specified address and runs
    /// until Ctrl-C.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Relay listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Relay stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
