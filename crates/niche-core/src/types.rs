//! Shared types used across the simulation crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete simulation time, counted in model steps.
pub type Tick = u64;

/// Unique identifier for anything occupying the grid.
///
/// Ids are handed out by the model from a monotonic counter, so a run
/// seeded identically produces identical ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Create an id from a raw value (for testing and seeding).
    pub fn from_seed(seed: u64) -> Self {
        Self(seed)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell on the toroidal lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// What kind of grid occupant an agent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A DNA-driven organism.
    Organism,
    /// A decaying structure that blocks recharge on its cell.
    Structure,
    /// A passive per-cell marker.
    Tile,
}

/// An occupant entry as stored in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub id: AgentId,
    pub kind: EntityKind,
}

/// Ecological archetype of an organism.
///
/// Archetypes pin part of the DNA at construction and override how some
/// actions behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// No pinned traits, default action behavior.
    #[default]
    Generic,
    /// Plants resources and shares energy.
    Enricher,
    /// Depletes resources; planting corrupts the cell and it never gives energy away.
    Consumer,
}

impl Species {
    pub fn name(&self) -> &'static str {
        match self {
            Species::Generic => "generic",
            Species::Enricher => "enricher",
            Species::Consumer => "consumer",
        }
    }
}

/// The organism action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move,
    Consume,
    Cooperate,
    Build,
    Reproduce,
    Plant,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Move,
        Action::Consume,
        Action::Cooperate,
        Action::Build,
        Action::Reproduce,
        Action::Plant,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::Consume => "consume",
            Action::Cooperate => "cooperate",
            Action::Build => "build",
            Action::Reproduce => "reproduce",
            Action::Plant => "plant",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of an agent's self-assessment at the start of its activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vitality {
    /// Able to act this step.
    Viable,
    /// Not placed on the grid; cannot act.
    Unplaced,
    /// Energy at or below zero.
    Starved,
    /// Cannot afford even the cheapest action.
    Exhausted,
    /// Lifespan ran out (structures).
    Expired,
}

impl Vitality {
    /// The death this state implies, if any.
    pub fn death_cause(&self) -> Option<DeathCause> {
        match self {
            Vitality::Viable => None,
            Vitality::Unplaced => Some(DeathCause::InvalidState),
            Vitality::Starved => Some(DeathCause::Starvation),
            Vitality::Exhausted => Some(DeathCause::Exhaustion),
            Vitality::Expired => Some(DeathCause::Expired),
        }
    }
}

/// Why an agent left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Activated without a position.
    InvalidState,
    /// Energy exhausted.
    Starvation,
    /// No affordable action remained.
    Exhaustion,
    /// Structure lifespan reached zero.
    Expired,
    /// Removed by the runtime (e.g. end of an evolutionary epoch).
    RuntimeTermination,
}

/// Record kept when an agent is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeathRecord {
    pub agent_id: AgentId,
    pub kind: EntityKind,
    pub age: Tick,
    pub tick: Tick,
    pub cause: DeathCause,
}

/// Read-only view of another organism, as seen by a neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborView {
    pub id: AgentId,
    pub energy: f64,
    pub cooperation: f64,
    pub species: Species,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vitality_maps_to_death_cause() {
        assert_eq!(Vitality::Viable.death_cause(), None);
        assert_eq!(
            Vitality::Unplaced.death_cause(),
            Some(DeathCause::InvalidState)
        );
        assert_eq!(
            Vitality::Exhausted.death_cause(),
            Some(DeathCause::Exhaustion)
        );
    }

    #[test]
    fn ids_order_by_value() {
        assert!(AgentId::from_seed(1) < AgentId::from_seed(2));
        assert_eq!(AgentId(7).to_string(), "#7");
    }
}
