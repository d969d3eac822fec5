//! # Niche Core
//!
//! Core traits and types for the niche-construction simulation.
//!
//! This crate defines what every other crate shares:
//!
//! - **types** - ids, grid cells, actions, species tags, death records
//! - **dna** - the simplex genome with Gaussian mutation and k-point crossover
//! - **spatial** - the toroidal spatial-index capability
//! - **habitat** - the view of the world an organism gets during its turn
//! - **agent** - identity and lifecycle shared by every grid occupant
//! - **rng** - the seedable generator threaded through a run
//!
//! ## Quick Start
//!
//! ```rust
//! use niche_core::prelude::*;
//!
//! let mut rng = seeded(42);
//! let dna = Dna::uniform().mutate(&mut rng, 0.1);
//! assert!(dna.is_normalized());
//! ```

pub mod types;
pub mod dna;
pub mod spatial;
pub mod habitat;
pub mod agent;
pub mod rng;
pub mod error;
pub mod prelude;
