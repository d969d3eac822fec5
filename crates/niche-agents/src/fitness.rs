//! Fitness scoring for evolutionary selection.
//!
//! At the end of an epoch every surviving organism is scored by a weighted
//! sum of what it did (steps survived, energy gathered, whether it built)
//! and what it carries (per-gene weights). The ranked scores decide which
//! genomes seed the next epoch.

use crate::organism::Organism;
use niche_core::agent::Agent;
use niche_core::dna::Gene;
use niche_core::types::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights of the multi-objective fitness function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    pub steps_alive: f64,
    pub energy_gathered: f64,
    /// Per-gene weight applied to the organism's DNA.
    pub traits: BTreeMap<Gene, f64>,
    /// Flat bonus for having built a structure.
    pub built_bonus: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            steps_alive: 0.01,
            energy_gathered: 0.1,
            traits: BTreeMap::from([(Gene::Cooperation, 1.0)]),
            built_bonus: 0.5,
        }
    }
}

impl FitnessWeights {
    pub fn score(&self, organism: &Organism) -> f64 {
        let traits: f64 = self
            .traits
            .iter()
            .map(|(gene, w)| w * organism.dna().get(*gene))
            .sum();
        let built = if organism.has_built() { self.built_bonus } else { 0.0 };
        self.steps_alive * organism.steps_alive() as f64
            + self.energy_gathered * organism.energy_gathered()
            + traits
            + built
    }
}

/// Per-organism fitness snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct OrganismFitness {
    pub agent_id: AgentId,
    pub fitness: f64,
    /// Generation number (0 = seeded, 1 = first offspring, etc.)
    pub generation: u32,
    pub steps_alive: u64,
    pub energy_gathered: f64,
    pub has_built: bool,
}

/// Score and rank organisms, fittest first. Ties keep input order.
pub fn rank<'a>(
    organisms: impl IntoIterator<Item = &'a Organism>,
    weights: &FitnessWeights,
) -> Vec<OrganismFitness> {
    let mut ranked: Vec<OrganismFitness> = organisms
        .into_iter()
        .map(|o| OrganismFitness {
            agent_id: o.id(),
            fitness: weights.score(o),
            generation: o.generation(),
            steps_alive: o.steps_alive(),
            energy_gathered: o.energy_gathered(),
            has_built: o.has_built(),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Mean fitness of a ranking; 0.0 when empty.
pub fn mean_fitness(ranked: &[OrganismFitness]) -> f64 {
    if ranked.is_empty() {
        0.0
    } else {
        ranked.iter().map(|f| f.fitness).sum::<f64>() / ranked.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OrganismParams;
    use niche_core::dna::Dna;
    use niche_core::types::Species;
    use std::sync::Arc;

    fn organism(id: u64, dna: Dna) -> Organism {
        Organism::new(
            AgentId(id),
            Species::Generic,
            dna,
            Arc::new(OrganismParams::default()),
        )
    }

    #[test]
    fn cooperation_weight_favors_cooperators() {
        let weights = FitnessWeights::default();
        let altruist = organism(1, Dna::uniform().pin(Gene::Cooperation, 0.6));
        let selfish = organism(2, Dna::uniform().pin(Gene::Cooperation, 0.01));
        assert!(weights.score(&altruist) > weights.score(&selfish));
    }

    #[test]
    fn rank_sorts_descending() {
        let weights = FitnessWeights::default();
        let a = organism(1, Dna::uniform().pin(Gene::Cooperation, 0.05));
        let b = organism(2, Dna::uniform().pin(Gene::Cooperation, 0.7));
        let ranked = rank([&a, &b], &weights);
        assert_eq!(ranked[0].agent_id, AgentId(2));
        assert!(ranked[0].fitness >= ranked[1].fitness);
        assert!(mean_fitness(&ranked) > 0.0);
    }

    #[test]
    fn empty_ranking_has_zero_mean() {
        assert_eq!(mean_fitness(&[]), 0.0);
    }
}
