//! Process lifecycle: bind, start the generator, serve until a signal.
//!
//! The listener is bound before the generator task exists, so a bind failure
//! ends startup without a single cycle having run.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use synthmetrics_core::error::{Result, SynthError};

use crate::app_state::AppState;
use crate::config::ExporterConfig;
use crate::generator::Generator;
use crate::obs::metrics::ResourceMetrics;
use crate::router;

/// A bound, not yet serving, exposition endpoint.
pub struct Exporter {
    listener: TcpListener,
    app: Router,
    local_addr: SocketAddr,
}

impl Exporter {
    pub async fn bind(state: AppState) -> Result<Self> {
        let addr = state.cfg().exporter.listen_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| SynthError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| SynthError::Bind { addr, source })?;

        Ok(Self {
            listener,
            app: router::build_router(state),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve scrapes until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| SynthError::Server(e.to_string()))
    }
}

/// Bind the endpoint, spawn the generator and serve until `shutdown`.
pub async fn run_until<F>(cfg: ExporterConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    run_with(cfg, Arc::new(ResourceMetrics::new()), shutdown).await
}

/// `run_until` over a caller-owned registry.
pub async fn run_with<F>(
    cfg: ExporterConfig,
    metrics: Arc<ResourceMetrics>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(cfg, Arc::clone(&metrics));

    let exporter = match Exporter::bind(state.clone()).await {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "Failed to start exporter: {e}");
            return Err(e);
        }
    };
    let addr = exporter.local_addr();
    tracing::info!(%addr, "Exporter started on port {}", addr.port());

    let generator = Generator::new(metrics, state.cfg().generator.clone());
    let task = tokio::spawn(generator.run());

    let served = exporter.serve(shutdown).await;
    task.abort();
    served
}

/// `run_until` with Ctrl+C / SIGTERM as the shutdown trigger.
pub async fn run(cfg: ExporterConfig) -> Result<()> {
    run_until(cfg, shutdown_signal()).await?;
    tracing::info!("Exporter stopped by user");
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
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
    tracing::info!("signal received, shutting down");
}
