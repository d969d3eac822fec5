//! Recharge-rate sweep.
//!
//! Runs one independent model per recharge rate, everything else held
//! fixed, and keeps each run's reporter series for comparison.

use crate::config::ModelConfig;
use crate::metrics::{DataCollector, StepRecord};
use crate::model::Model;
use niche_core::error::{ensure_non_negative, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Parameters of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub rates: Vec<f64>,
    pub steps: u64,
    pub n_agents: usize,
    pub max_resource: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            rates: default_rates(),
            steps: 500,
            n_agents: 20,
            max_resource: 2.0,
        }
    }
}

impl SweepConfig {
    /// Base model for every run: `base` with this sweep's population and
    /// capacity.
    pub fn apply(&self, base: &ModelConfig) -> ModelConfig {
        ModelConfig {
            n_agents: self.n_agents,
            max_resource: self.max_resource,
            ..base.clone()
        }
    }
}

/// 0.1 to 1.0 in steps of 0.1.
pub fn default_rates() -> Vec<f64> {
    (1..=10).map(|i| i as f64 / 10.0).collect()
}

/// One run of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub recharge_rate: f64,
    pub final_record: Option<StepRecord>,
    pub collector: DataCollector,
}

/// Run `steps` steps of `base` once per recharge rate.
pub fn recharge_sweep(base: &ModelConfig, rates: &[f64], steps: u64) -> Result<Vec<SweepResult>> {
    recharge_sweep_with(base, rates, steps, |_, _| {})
}

/// Like [`recharge_sweep`], calling `on_done(index, result)` after each run.
pub fn recharge_sweep_with(
    base: &ModelConfig,
    rates: &[f64],
    steps: u64,
    mut on_done: impl FnMut(usize, &SweepResult),
) -> Result<Vec<SweepResult>> {
    let mut results = Vec::with_capacity(rates.len());
    for (i, rate) in rates.iter().copied().enumerate() {
        ensure_non_negative("recharge_rate", rate)?;
        let config = ModelConfig {
            recharge_rate: rate,
            ..base.clone()
        };
        let mut model = Model::new(config)?;
        model.run(steps);
        let collector = model.into_collector();
        let result = SweepResult {
            recharge_rate: rate,
            final_record: collector.latest().cloned(),
            collector,
        };
        info!(
            recharge_rate = rate,
            steps,
            organisms = result
                .final_record
                .as_ref()
                .map(|r| r.get(crate::metrics::Reporter::Organisms))
                .unwrap_or(0.0),
            "sweep run complete"
        );
        on_done(i, &result);
        results.push(result);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates_span_tenth_to_one() {
        let rates = default_rates();
        assert_eq!(rates.len(), 10);
        assert_eq!(rates[0], 0.1);
        assert_eq!(rates[9], 1.0);
    }

    #[test]
    fn negative_rate_is_rejected() {
        let base = ModelConfig {
            width: 4,
            height: 4,
            n_agents: 2,
            ..ModelConfig::default()
        };
        assert!(recharge_sweep(&base, &[-0.5], 1).is_err());
    }

    #[test]
    fn sweep_config_overrides_population() {
        let sweep = SweepConfig::default();
        let config = sweep.apply(&ModelConfig::default());
        assert_eq!(config.n_agents, 20);
        assert_eq!(config.max_resource, 2.0);
    }
}
