//! Fluent builder for models.
//!
//! # Example
//!
//! ```rust
//! use niche_runtime::model_builder::ModelBuilder;
//! use niche_agents::spawn::SpeciesMix;
//!
//! let mut model = ModelBuilder::new()
//!     .grid(10, 10)
//!     .agents(12)
//!     .species_mix(SpeciesMix::Split)
//!     .seed(7)
//!     .build()?;
//!
//! model.run(20);
//! assert_eq!(model.tick(), 20);
//! # Ok::<(), niche_core::error::SimError>(())
//! ```

use crate::config::ModelConfig;
use crate::model::Model;
use niche_agents::params::OrganismParams;
use niche_agents::spawn::{DnaSeed, GenomeSeed, SpeciesMix};
use niche_core::dna::Dna;
use niche_core::error::Result;

/// Builder for creating models.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    config: ModelConfig,
    genomes: Option<Vec<Dna>>,
}

impl ModelBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: ModelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn grid(mut self, width: usize, height: usize) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn agents(mut self, n_agents: usize) -> Self {
        self.config.n_agents = n_agents;
        self
    }

    pub fn mutation(mut self, rate: f64, scale: f64) -> Self {
        self.config.mutation_rate = rate;
        self.config.mutation_scale = scale;
        self
    }

    /// Cell capacity and the level every cell starts at.
    pub fn resources(mut self, max_resource: f64, initial: f64) -> Self {
        self.config.max_resource = max_resource;
        self.config.initial_resource = initial;
        self
    }

    pub fn recharge_rate(mut self, rate: f64) -> Self {
        self.config.recharge_rate = rate;
        self
    }

    pub fn structure_lifespan(mut self, lifespan: u32) -> Self {
        self.config.structure_lifespan = lifespan;
        self
    }

    pub fn exclusive_cells(mut self, enabled: bool) -> Self {
        self.config.exclusive_cells = enabled;
        self
    }

    pub fn tiles(mut self, enabled: bool) -> Self {
        self.config.tiles = enabled;
        self
    }

    pub fn species_mix(mut self, mix: SpeciesMix) -> Self {
        self.config.species_mix = mix;
        self
    }

    pub fn dna_seed(mut self, seed: DnaSeed) -> Self {
        self.config.dna_seed = seed;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn organism(mut self, params: OrganismParams) -> Self {
        self.config.organism = params;
        self
    }

    /// Seed the population from these genomes instead of the DNA seed
    /// distribution.
    pub fn genomes(mut self, genomes: Vec<Dna>) -> Self {
        self.genomes = Some(genomes);
        self
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Validate the configuration and build the model.
    pub fn build(self) -> Result<Model> {
        match self.genomes {
            Some(genomes) => {
                let mut policy = GenomeSeed::new(genomes, self.config.species_mix);
                Model::with_seed_policy(self.config, &mut policy)
            }
            None => Model::new(self.config),
        }
    }
}
