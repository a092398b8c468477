//! HTTP server lifecycle.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::StartupError;
use crate::routes::{cors_layer, create_router};
use crate::state::ApiState;

/// Listener and CORS settings.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin (gateway role only).
    pub cors_origin: Option<String>,
}

/// The dashboard API server.
pub struct ApiServer {
    options: ServerOptions,
    router: Router,
}

impl ApiServer {
    pub fn new(state: ApiState, options: ServerOptions) -> Result<Self, StartupError> {
        let cors = cors_layer(state.role, options.cors_origin.as_deref())?;
        let router = create_router(state, cors);
        Ok(Self { options, router })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.options.host, self.options.port)
    }

    /// Bind the configured address and serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), StartupError> {
        let addr = self.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| StartupError::Bind { addr, source })?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr().map_err(|source| StartupError::Bind {
            addr: self.bind_address(),
            source,
        })?;

        info!("Swarm dashboard API listening on http://{}", addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| StartupError::Serve { addr, source })?;

        info!("Swarm dashboard API stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
