//! synthmetrics exporter
//!
//! - Metrics endpoint: GET /metrics (Prometheus text format)
//! - Random CPU / memory / disk / network values, refreshed every interval
//! - Occasional simulated errors and high-load spikes

use std::process::ExitCode;

use synthmetrics_exporter::{config, obs, server};

#[tokio::main]
async fn main() -> ExitCode {
    obs::init_tracing();

    let path = config::DEFAULT_CONFIG_PATH;
    let cfg = match config::load_or_default(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(%path, code = e.code().as_str(), "config load failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match server::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "exporter exited: {e}");
            ExitCode::FAILURE
        }
    }
}
