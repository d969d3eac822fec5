//! # Niche Agents
//!
//! The occupants of the niche-construction grid.
//!
//! - **Organism** - spends energy on DNA-weighted actions: move, consume,
//!   cooperate, build, reproduce, plant
//! - **Structure** - a built artifact that blocks recharge and ages out
//! - **Tile** - a passive cell marker
//!
//! Alongside the agents live the parameters that price their actions, the
//! species archetypes, the policies that seed an initial population, and
//! the fitness function used by the evolutionary loop.

pub mod params;
pub mod species;
pub mod organism;
pub mod structure;
pub mod tile;
pub mod entity;
pub mod fitness;
pub mod spawn;
pub mod prelude;
