use std::future::Future;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::SimulatorConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::{Lifecycle, ServiceState};
use crate::AppState;

/// CBS simulator HTTP server.
pub struct CbsServer {
    state: AppState,
}

impl CbsServer {
    /// Validate `config` and seed a fresh ledger.
    pub fn new(config: SimulatorConfig) -> ServerResult<Self> {
        config.validate()?;
        Ok(Self {
            state: AppState::seeded(config)?,
        })
    }

    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.state.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let lifecycle = self.state.lifecycle.clone();
        self.serve_with_shutdown(shutdown_signal(lifecycle)).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.state.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;
        let app = self.router();
        let lifecycle = self.state.lifecycle.clone();

        lifecycle.transition(ServiceState::Running);
        info!(
            addr = %bind_addr,
            environment = %self.state.config.environment,
            "CBS simulator listening"
        );

        let drain = lifecycle.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                drain.transition(ServiceState::ShuttingDown);
            })
            .await
            .map_err(|e| ServerError::Internal(e.to_string()));

        lifecycle.transition(ServiceState::Stopped);
        info!("CBS simulator stopped");
        result
    }
}

async fn shutdown_signal(lifecycle: Lifecycle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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

    info!(state = %lifecycle.state(), "Shutdown signal received");
}
