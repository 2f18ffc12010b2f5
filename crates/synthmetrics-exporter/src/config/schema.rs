use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::LoadCondition;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub generator: GeneratorSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            generator: GeneratorSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SynthError::UnsupportedVersion);
        }
        self.exporter.validate()?;
        self.generator.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SynthError::Config(format!(
                "exporter.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSection {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_max_request_secs")]
    pub max_request_secs: f64,

    /// Sleep for the drawn request duration, not only record it.
    #[serde(default = "default_true")]
    pub simulate_request_delay: bool,

    #[serde(default = "default_error_probability")]
    pub error_probability: f64,

    #[serde(default = "default_spike_probability")]
    pub spike_probability: f64,

    #[serde(default = "default_spike_conditions")]
    pub spike_conditions: Vec<LoadCondition>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_request_secs: default_max_request_secs(),
            simulate_request_delay: true,
            error_probability: default_error_probability(),
            spike_probability: default_spike_probability(),
            spike_conditions: default_spike_conditions(),
        }
    }
}

impl GeneratorSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=3_600_000).contains(&self.interval_ms) {
            return Err(SynthError::Config(
                "generator.interval_ms must be between 1 and 3600000".into(),
            ));
        }
        if !(0.0..=60.0).contains(&self.max_request_secs) {
            return Err(SynthError::Config(
                "generator.max_request_secs must be between 0 and 60".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.error_probability) {
            return Err(SynthError::Config(
                "generator.error_probability must be between 0 and 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.spike_probability) {
            return Err(SynthError::Config(
                "generator.spike_probability must be between 0 and 1".into(),
            ));
        }
        if self.spike_probability > 0.0 && self.spike_conditions.is_empty() {
            return Err(SynthError::Config(
                "generator.spike_conditions must not be empty when spikes are enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_interval_ms() -> u64 {
    1000
}
fn default_max_request_secs() -> f64 {
    3.0
}
fn default_true() -> bool {
    true
}
fn default_error_probability() -> f64 {
    0.10
}
fn default_spike_probability() -> f64 {
    0.05
}
fn default_spike_conditions() -> Vec<LoadCondition> {
    LoadCondition::ALL.to_vec()
}
