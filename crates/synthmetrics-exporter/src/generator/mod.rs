//! Random metric generator.
//!
//! One `Generator` owns the random source and is the only writer of the
//! registry. `run` loops forever: every cycle is wrapped so an `Err` or a
//! panic is logged and counted in `error_total`, and the loop carries on.

pub mod spike;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::{ResourceKind, ResourceSample};

use crate::config::GeneratorSection;
use crate::obs::metrics::ResourceMetrics;

pub use spike::{simulate_high_load, SpikeEvent};

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub sample: ResourceSample,
    pub request_secs: f64,
    pub simulated_error: bool,
    pub spike: Option<SpikeEvent>,
}

pub struct Generator<R = StdRng> {
    metrics: Arc<ResourceMetrics>,
    cfg: GeneratorSection,
    rng: R,
}

impl Generator<StdRng> {
    /// Generator backed by an unseeded `StdRng`.
    pub fn new(metrics: Arc<ResourceMetrics>, cfg: GeneratorSection) -> Self {
        Self::with_rng(metrics, cfg, StdRng::from_entropy())
    }
}

impl<R: Rng + Send> Generator<R> {
    pub fn with_rng(metrics: Arc<ResourceMetrics>, cfg: GeneratorSection, rng: R) -> Self {
        Self { metrics, cfg, rng }
    }

    pub fn metrics(&self) -> &Arc<ResourceMetrics> {
        &self.metrics
    }

    /// Run one cycle: draw and record a sample, simulate a request, maybe
    /// simulate an error, count the update, then maybe spike one gauge.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let sample = ResourceSample::draw(&mut self.rng);
        self.metrics.record_sample(&sample);

        let request_secs = self.rng.gen_range(0.0..=self.cfg.max_request_secs);
        if self.cfg.simulate_request_delay {
            tokio::time::sleep(Duration::from_secs_f64(request_secs)).await;
        }
        self.metrics.request_time.observe(request_secs);

        let simulated_error = self.rng.gen_bool(self.cfg.error_probability);
        if simulated_error {
            self.metrics.errors.inc();
            tracing::warn!("An error occurred during metric generation");
        }

        self.metrics.updates.inc();

        tracing::info!("Metrics updated: {}", describe(&self.metrics.snapshot()));

        let spike = if self.rng.gen_bool(self.cfg.spike_probability) {
            Some(simulate_high_load(
                &self.metrics,
                &self.cfg.spike_conditions,
                &mut self.rng,
            )?)
        } else {
            None
        };

        Ok(CycleReport {
            sample,
            request_secs,
            simulated_error,
            spike,
        })
    }

    /// Run one cycle behind the fault boundary. Faults are logged and
    /// counted; `None` means the cycle did not complete.
    pub async fn tick(&mut self) -> Option<CycleReport> {
        let fault = match AssertUnwindSafe(self.run_cycle()).catch_unwind().await {
            Ok(Ok(report)) => return Some(report),
            Ok(Err(e)) => e,
            Err(payload) => SynthError::Internal(panic_message(payload.as_ref())),
        };

        tracing::error!(code = fault.code().as_str(), "An unexpected error occurred: {fault}");
        self.metrics.errors.inc();
        None
    }

    /// Generate forever. Only process shutdown stops this future.
    pub async fn run(mut self) {
        let interval = self.cfg.interval();
        tracing::info!(interval_ms = self.cfg.interval_ms, "generator started");
        loop {
            self.tick().await;
            // Faulty cycles wait out the interval too, unlike an immediate retry.
            tokio::time::sleep(interval).await;
        }
    }
}

/// `CPU=12.34%, Memory=...`, one entry per indicator with its unit.
fn describe(sample: &ResourceSample) -> String {
    ResourceKind::ALL
        .iter()
        .map(|&kind| {
            let sep = if kind.unit() == "%" { "" } else { " " };
            format!("{}={:.2}{}{}", kind.label(), sample.get(kind), sep, kind.unit())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("cycle panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("cycle panicked: {s}")
    } else {
        "cycle panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_line_carries_units() {
        let s = ResourceSample {
            cpu: 12.346,
            memory: 50.0,
            disk_io: 250.5,
            network_bandwidth: 999.5,
        };
        assert_eq!(
            describe(&s),
            "CPU=12.35%, Memory=50.00%, Disk I/O=250.50 ops/s, Network Bandwidth=999.50 Mbps"
        );
    }

    #[test]
    fn panic_payloads_are_described() {
        let p: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(p.as_ref()), "cycle panicked: boom");
        let p: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(p.as_ref()), "cycle panicked: bang");
        let p: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(p.as_ref()), "cycle panicked");
    }
}
