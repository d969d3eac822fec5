//! External evolutionary loop.
//!
//! Each epoch builds a fresh model seeded with the current genomes, runs it
//! for a fixed number of steps, and scores whoever is still alive. The top
//! scorers become parents: pairs drawn uniformly among them are recombined
//! by k-point crossover and then mutated with the same operator organisms
//! use when they reproduce. If nobody survives, the epoch's own seed
//! genomes are reused as parents.

use crate::config::ModelConfig;
use crate::metrics::mean;
use crate::model::Model;
use niche_agents::fitness::{self, FitnessWeights};
use niche_agents::organism::Organism;
use niche_agents::spawn::{DnaSeed, GenomeSeed};
use niche_core::agent::Agent;
use niche_core::dna::{Dna, Gene};
use niche_core::error::{Result, SimError};
use niche_core::rng::{seeded, SimRng};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Parameters of the evolutionary loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub epochs: usize,
    pub steps_per_epoch: u64,
    /// Organisms per epoch.
    pub population: usize,
    /// How many top survivors become parents.
    pub parents: usize,
    pub crossover_points: usize,
    pub weights: FitnessWeights,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            steps_per_epoch: 200,
            population: 50,
            parents: 10,
            crossover_points: 2,
            weights: FitnessWeights::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(SimError::invalid_config("population", 0, "must be at least 1"));
        }
        if self.parents == 0 {
            return Err(SimError::invalid_config("parents", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// What one epoch produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub survivors: usize,
    pub mean_energy: f64,
    pub mean_cooperation: f64,
    pub mean_fitness: f64,
    pub max_fitness: f64,
    /// Mean pairwise DNA distance among survivors.
    pub genome_divergence: f64,
}

/// Drives epochs and keeps the genomes that seed the next one.
pub struct Evolution {
    model_config: ModelConfig,
    config: EvolutionConfig,
    rng: SimRng,
    seeds: Vec<Dna>,
    history: Vec<EpochSummary>,
}

impl Evolution {
    pub fn new(model_config: ModelConfig, config: EvolutionConfig) -> Result<Self> {
        config.validate()?;
        let seeding = ModelConfig {
            n_agents: config.population,
            ..model_config.clone()
        };
        seeding.validate()?;

        let mut rng = seeded(model_config.seed);
        let seeds = (0..config.population)
            .map(|_| match model_config.dna_seed {
                DnaSeed::Uniform => Dna::uniform(),
                DnaSeed::Random => Dna::random(&mut rng),
            })
            .collect();
        Ok(Self {
            model_config,
            config,
            rng,
            seeds,
            history: Vec::new(),
        })
    }

    /// Genomes that will seed the next epoch.
    pub fn seeds(&self) -> &[Dna] {
        &self.seeds
    }

    pub fn history(&self) -> &[EpochSummary] {
        &self.history
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run one epoch and breed the next generation of seeds.
    pub fn run_epoch(&mut self) -> Result<EpochSummary> {
        let epoch = self.history.len();
        let config = ModelConfig {
            n_agents: self.config.population,
            seed: self.model_config.seed.wrapping_add(epoch as u64),
            ..self.model_config.clone()
        };
        let mut policy = GenomeSeed::new(self.seeds.clone(), config.species_mix);
        let mut model = Model::with_seed_policy(config, &mut policy)?;
        model.run(self.config.steps_per_epoch);

        let survivors = model.harvest();
        let summary = self.summarize(epoch, &survivors);
        info!(
            epoch,
            survivors = summary.survivors,
            mean_fitness = summary.mean_fitness,
            max_fitness = summary.max_fitness,
            "epoch complete"
        );

        let parents = self.select_parents(&survivors);
        if survivors.is_empty() {
            debug!(epoch, "no survivors, reusing seed genomes as parents");
        }
        self.seeds = self.breed(&parents);
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Run every configured epoch.
    pub fn run(&mut self) -> Result<Vec<EpochSummary>> {
        for _ in 0..self.config.epochs {
            self.run_epoch()?;
        }
        Ok(self.history.clone())
    }

    fn summarize(&self, epoch: usize, survivors: &[Organism]) -> EpochSummary {
        let ranked = fitness::rank(survivors, &self.config.weights);
        EpochSummary {
            epoch,
            survivors: survivors.len(),
            mean_energy: mean(survivors.iter().map(|o| o.energy())),
            mean_cooperation: mean(survivors.iter().map(|o| o.dna().get(Gene::Cooperation))),
            mean_fitness: fitness::mean_fitness(&ranked),
            max_fitness: ranked.first().map(|f| f.fitness).unwrap_or(0.0),
            genome_divergence: divergence(survivors.iter().map(|o| o.dna()).collect()),
        }
    }

    fn select_parents(&self, survivors: &[Organism]) -> Vec<Dna> {
        if survivors.is_empty() {
            return self.seeds.clone();
        }
        let ranked = fitness::rank(survivors, &self.config.weights);
        ranked
            .iter()
            .take(self.config.parents)
            .filter_map(|f| survivors.iter().find(|o| o.id() == f.agent_id))
            .map(|o| o.dna().clone())
            .collect()
    }

    fn breed(&mut self, parents: &[Dna]) -> Vec<Dna> {
        let mutation = self.model_config.mutation();
        let points = self.config.crossover_points;
        let mut children = Vec::with_capacity(self.config.population);
        for _ in 0..self.config.population {
            let (Some(a), Some(b)) = (parents.choose(&mut self.rng), parents.choose(&mut self.rng)) else {
                break;
            };
            let child = Dna::crossover(a, b, points, &mut self.rng);
            children.push(child.inherit(&mut self.rng, &mutation));
        }
        children
    }
}

/// Mean pairwise Euclidean distance; 0.0 with fewer than two genomes.
pub fn divergence(genomes: Vec<&Dna>) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in genomes.iter().enumerate() {
        for b in &genomes[i + 1..] {
            total += a.distance(b);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}
