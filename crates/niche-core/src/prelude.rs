//! Niche Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use niche_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    AgentId, Cell, Tick,
    EntityKind, Occupant,
    Species, Action,
    Vitality, DeathCause, DeathRecord,
    NeighborView,
};

// Re-export the genome
pub use crate::dna::{Dna, Gene, MutationParams, DNA_FLOOR};

// Re-export the Agent trait
pub use crate::agent::Agent;

// Re-export the Habitat trait
pub use crate::habitat::Habitat;

// Re-export the spatial index capability
pub use crate::spatial::{moore_neighborhood, SpatialIndex};

// Re-export randomness
pub use crate::rng::{seeded, SimRng};

// Re-export error types
pub use crate::error::{Result, SimError};
