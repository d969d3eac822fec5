//! Model configuration.
//!
//! All tunable parameters of a run live in [`ModelConfig`]. The defaults
//! describe a 20x20 torus seeded with 50 organisms and a 1% chance of
//! mutation per birth.

use niche_agents::params::OrganismParams;
use niche_agents::spawn::{DnaSeed, SpeciesMix};
use niche_agents::structure::DEFAULT_LIFESPAN;
use niche_core::dna::MutationParams;
use niche_core::error::{ensure_non_negative, ensure_probability, Result, SimError};
use serde::{Deserialize, Serialize};

/// Configuration for one model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub width: usize,
    pub height: usize,
    /// Organisms placed at construction.
    pub n_agents: usize,
    /// Probability that a child's DNA is mutated.
    pub mutation_rate: f64,
    /// Standard deviation of the per-gene mutation noise.
    pub mutation_scale: f64,
    pub max_resource: f64,
    /// Level every cell starts at.
    pub initial_resource: f64,
    /// Resource added to each uncovered cell per step.
    pub recharge_rate: f64,
    pub structure_lifespan: u32,
    /// Place initial organisms on distinct cells.
    pub exclusive_cells: bool,
    /// Put a passive tile on every cell.
    pub tiles: bool,
    pub species_mix: SpeciesMix,
    pub dna_seed: DnaSeed,
    /// Seed of the run's random generator.
    pub seed: u64,
    pub organism: OrganismParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            n_agents: 50,
            mutation_rate: 0.01,
            mutation_scale: 0.05,
            max_resource: 2.0,
            initial_resource: 2.0,
            recharge_rate: 0.25,
            structure_lifespan: DEFAULT_LIFESPAN,
            exclusive_cells: true,
            tiles: false,
            species_mix: SpeciesMix::default(),
            dna_seed: DnaSeed::default(),
            seed: 42,
            organism: OrganismParams::default(),
        }
    }
}

impl ModelConfig {
    pub fn mutation(&self) -> MutationParams {
        MutationParams {
            rate: self.mutation_rate,
            scale: self.mutation_scale,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Check every field before a model is built from this config.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::invalid_config(
                "grid",
                format!("{}x{}", self.width, self.height),
                "width and height must be positive",
            ));
        }
        if self.exclusive_cells && self.n_agents > self.cell_count() {
            return Err(SimError::invalid_config(
                "n_agents",
                self.n_agents,
                format!("exceeds the {} cells of the grid", self.cell_count()),
            ));
        }
        ensure_probability("mutation_rate", self.mutation_rate)?;
        ensure_non_negative("mutation_scale", self.mutation_scale)?;
        ensure_non_negative("max_resource", self.max_resource)?;
        ensure_non_negative("initial_resource", self.initial_resource)?;
        ensure_non_negative("recharge_rate", self.recharge_rate)?;
        self.organism.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ModelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 400);
    }

    #[test]
    fn overcrowding_fails_fast() {
        let config = ModelConfig {
            width: 3,
            height: 3,
            n_agents: 10,
            ..ModelConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimError::Config { .. })));

        let stacked = ModelConfig {
            exclusive_cells: false,
            ..config
        };
        assert!(stacked.validate().is_ok());
    }

    #[test]
    fn mutation_rate_is_a_probability() {
        let config = ModelConfig {
            mutation_rate: 1.5,
            ..ModelConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutation_rate"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ModelConfig =
            serde_json::from_str(r#"{"width": 10, "species_mix": "split"}"#).unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.height, 20);
        assert_eq!(config.species_mix, SpeciesMix::Split);
    }
}
