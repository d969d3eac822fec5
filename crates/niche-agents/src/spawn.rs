//! Seeding policies for the initial population.
//!
//! A model asks its seed policy for the species and DNA of each of the
//! `n_agents` organisms it places at construction. The mixed policy draws
//! from a species mix and a DNA distribution; the genome policy replays a
//! fixed list of genomes, which is how the evolutionary loop seeds each
//! epoch with the previous epoch's offspring.

use niche_core::dna::Dna;
use niche_core::rng::SimRng;
use niche_core::types::Species;
use serde::{Deserialize, Serialize};

/// How species are assigned across the initial population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesMix {
    /// Everyone is generic.
    #[default]
    Generic,
    /// First half enrichers, the rest consumers.
    Split,
    /// Enrichers on even indices, consumers on odd ones.
    Alternate,
}

impl SpeciesMix {
    pub fn species_for(&self, index: usize, total: usize) -> Species {
        match self {
            SpeciesMix::Generic => Species::Generic,
            SpeciesMix::Split if index < total / 2 => Species::Enricher,
            SpeciesMix::Split => Species::Consumer,
            SpeciesMix::Alternate if index % 2 == 0 => Species::Enricher,
            SpeciesMix::Alternate => Species::Consumer,
        }
    }
}

/// How initial DNA is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnaSeed {
    Uniform,
    #[default]
    Random,
}

/// Trait for seed policies.
pub trait SeedPolicy {
    /// Species and DNA for the `index`-th of `total` initial organisms.
    fn seed(&mut self, index: usize, total: usize, rng: &mut SimRng) -> (Species, Dna);
}

/// Species from a mix, DNA from a distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixedSeed {
    pub mix: SpeciesMix,
    pub dna: DnaSeed,
}

impl MixedSeed {
    pub fn new(mix: SpeciesMix, dna: DnaSeed) -> Self {
        Self { mix, dna }
    }
}

impl SeedPolicy for MixedSeed {
    fn seed(&mut self, index: usize, total: usize, rng: &mut SimRng) -> (Species, Dna) {
        let dna = match self.dna {
            DnaSeed::Uniform => Dna::uniform(),
            DnaSeed::Random => Dna::random(rng),
        };
        (self.mix.species_for(index, total), dna)
    }
}

/// Replays a list of genomes, cycling if the population is larger.
#[derive(Debug, Clone)]
pub struct GenomeSeed {
    genomes: Vec<Dna>,
    mix: SpeciesMix,
}

impl GenomeSeed {
    pub fn new(genomes: Vec<Dna>, mix: SpeciesMix) -> Self {
        Self { genomes, mix }
    }
}

impl SeedPolicy for GenomeSeed {
    fn seed(&mut self, index: usize, total: usize, rng: &mut SimRng) -> (Species, Dna) {
        let species = self.mix.species_for(index, total);
        if self.genomes.is_empty() {
            return (species, Dna::random(rng));
        }
        (species, self.genomes[index % self.genomes.len()].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use niche_core::rng::seeded;

    #[test]
    fn split_mix_halves_population() {
        let species: Vec<Species> = (0..5).map(|i| SpeciesMix::Split.species_for(i, 5)).collect();
        assert_eq!(
            species,
            vec![
                Species::Enricher,
                Species::Enricher,
                Species::Consumer,
                Species::Consumer,
                Species::Consumer
            ]
        );
    }

    #[test]
    fn alternate_mix_uses_parity() {
        assert_eq!(SpeciesMix::Alternate.species_for(0, 4), Species::Enricher);
        assert_eq!(SpeciesMix::Alternate.species_for(3, 4), Species::Consumer);
    }

    #[test]
    fn random_seed_draws_normalized_dna() {
        let mut rng = seeded(9);
        let mut policy = MixedSeed::new(SpeciesMix::Generic, DnaSeed::Random);
        let (species, dna) = policy.seed(0, 1, &mut rng);
        assert_eq!(species, Species::Generic);
        assert!(dna.is_normalized());
        assert_ne!(dna, Dna::uniform());
    }

    #[test]
    fn genome_seed_cycles() {
        let mut rng = seeded(1);
        let a = Dna::uniform().pin(niche_core::dna::Gene::Movement, 0.5);
        let mut policy = GenomeSeed::new(vec![a.clone(), Dna::uniform()], SpeciesMix::Generic);
        assert_eq!(policy.seed(2, 3, &mut rng).1, a);
    }
}
