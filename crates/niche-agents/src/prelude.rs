//! Niche Agents Prelude — convenient imports for common usage.
//!
//! ```rust
//! use niche_agents::prelude::*;
//! ```

// Re-export agent types
pub use crate::organism::{Activation, Decline, Effect, Gift, Organism};
pub use crate::structure::{Structure, DEFAULT_LIFESPAN};
pub use crate::tile::Tile;
pub use crate::entity::Entity;
pub use crate::params::{ActionCosts, ConsumptionPolicy, OrganismParams, ReproductionPolicy};
pub use crate::species::Archetype;
pub use crate::fitness::{FitnessWeights, OrganismFitness};
pub use crate::spawn::{DnaSeed, GenomeSeed, MixedSeed, SeedPolicy, SpeciesMix};

// Re-export from core
pub use niche_core::prelude::*;
