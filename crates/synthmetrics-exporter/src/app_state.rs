//! Shared application state for the exporter's HTTP handlers.

use std::sync::Arc;

use crate::config::ExporterConfig;
use crate::obs::metrics::ResourceMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ResourceMetrics>,
}

struct AppStateInner {
    cfg: ExporterConfig,
}

impl AppState {
    /// The registry is created by the caller so the generator can hold the
    /// same `Arc`.
    pub fn new(cfg: ExporterConfig, metrics: Arc<ResourceMetrics>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            metrics,
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> Arc<ResourceMetrics> {
        Arc::clone(&self.metrics)
    }
}
