//! Habitat — what an organism can see and touch during its activation.
//!
//! The habitat is the model seen from inside one agent's turn: the
//! resource field, grid occupancy, read-only views of neighbors, and the
//! simulation-wide parameters. Agents read from and write to the habitat,
//! but never directly to each other. Effects that touch another agent
//! (energy gifts, newborns, structures) are returned to the runtime, which
//! applies them before the next agent acts.

use crate::dna::MutationParams;
use crate::types::*;

/// The shared environment as exposed to one activation.
pub trait Habitat {
    // --- Grid ---

    /// Moore neighborhood on the torus.
    fn neighborhood(&self, cell: Cell, radius: usize, include_center: bool) -> Vec<Cell>;

    /// Ids of organisms standing on `cell`.
    fn organisms_at(&self, cell: Cell) -> Vec<AgentId>;

    /// Whether any organism stands on `cell`.
    fn has_organism(&self, cell: Cell) -> bool {
        !self.organisms_at(cell).is_empty()
    }

    /// Whether a structure stands on `cell`.
    fn has_structure(&self, cell: Cell) -> bool;

    /// Whether a structure stands anywhere within `radius` of `cell`,
    /// `cell` itself included.
    fn structure_within(&self, cell: Cell, radius: usize) -> bool {
        self.neighborhood(cell, radius, true)
            .into_iter()
            .any(|c| self.has_structure(c))
    }

    /// Move an organism on the grid.
    fn relocate(&mut self, id: AgentId, from: Cell, to: Cell);

    // --- Resource field ---

    /// Resource level on a cell.
    fn resource(&self, cell: Cell) -> f64;

    /// Take up to `requested` from a cell; returns the amount granted.
    fn consume(&mut self, cell: Cell, requested: f64) -> f64;

    /// Add `amount` (possibly negative) to a cell, clamped to
    /// `[0, max_resource]`; returns the change actually applied.
    fn enrich(&mut self, cell: Cell, amount: f64) -> f64;

    fn max_resource(&self) -> f64;

    fn recharge_rate(&self) -> f64;

    // --- Neighbors ---

    /// Read-only view of another organism.
    fn neighbor(&self, id: AgentId) -> Option<NeighborView>;

    // --- Lifecycle ---

    /// Allocate an id for a new agent.
    fn next_id(&mut self) -> AgentId;

    /// Mutation parameters used for offspring.
    fn mutation(&self) -> MutationParams;

    /// Current simulation tick.
    fn current_tick(&self) -> Tick;
}
