//! Archetype behavior attached to each species.

use niche_core::dna::{Dna, Gene};
use niche_core::types::Species;

const ENRICHER_PINS: [(Gene, f64); 2] = [(Gene::Planting, 0.3), (Gene::Cooperation, 0.25)];
const CONSUMER_PINS: [(Gene, f64); 2] = [(Gene::Consumption, 0.35), (Gene::Planting, 0.05)];

/// How a species shapes its DNA and its actions.
pub trait Archetype {
    /// Genes held at fixed weights for this species.
    fn pinned_genes(&self) -> &'static [(Gene, f64)];

    /// Apply the species' pins to a genome, renormalizing the rest.
    fn constrain(&self, dna: Dna) -> Dna {
        let pins = self.pinned_genes();
        if pins.is_empty() {
            dna
        } else {
            dna.pinned(pins)
        }
    }

    /// Whether cooperating includes an energy gift to a neighbor.
    fn shares_energy(&self) -> bool;

    /// +1 when planting enriches a cell, -1 when it corrupts it.
    fn planting_sign(&self) -> f64;
}

impl Archetype for Species {
    fn pinned_genes(&self) -> &'static [(Gene, f64)] {
        match self {
            Species::Generic => &[],
            Species::Enricher => &ENRICHER_PINS,
            Species::Consumer => &CONSUMER_PINS,
        }
    }

    fn shares_energy(&self) -> bool {
        !matches!(self, Species::Consumer)
    }

    fn planting_sign(&self) -> f64 {
        match self {
            Species::Consumer => -1.0,
            _ => 1.0,
        }
    }
}
