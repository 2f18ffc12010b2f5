//! High-load spike simulation.

use rand::seq::SliceRandom;
use rand::Rng;

use synthmetrics_core::error::{Result, SynthError};
use synthmetrics_core::LoadCondition;

use crate::obs::metrics::ResourceMetrics;

/// A spike applied during one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeEvent {
    pub condition: LoadCondition,
    pub value: f64,
}

/// Pick one of `conditions` uniformly and pin its target gauge inside the
/// condition's high band. Only the target gauge is touched.
pub fn simulate_high_load<R: Rng + ?Sized>(
    metrics: &ResourceMetrics,
    conditions: &[LoadCondition],
    rng: &mut R,
) -> Result<SpikeEvent> {
    let condition = *conditions
        .choose(rng)
        .ok_or_else(|| SynthError::Internal("spike triggered with no load conditions".into()))?;

    let value = condition.draw(rng);
    metrics.gauge(condition.target()).set(value);
    metrics.spikes.inc(&[("condition", condition.as_str())]);

    tracing::warn!(condition = %condition, value, "{}", condition.message());
    Ok(SpikeEvent { condition, value })
}
