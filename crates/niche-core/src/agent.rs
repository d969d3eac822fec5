//! Anything that occupies the grid and is activated each step.
//!
//! Organisms, structures and tiles share identity, position and an age.
//! Each of them can also assess whether it is still able to take part in
//! the next step; the runtime removes agents whose self-assessment reports
//! a death.

use crate::types::*;

/// Shared identity and lifecycle surface of every grid occupant.
pub trait Agent {
    /// The agent's unique identity.
    fn id(&self) -> AgentId;

    /// What kind of occupant this is.
    fn kind(&self) -> EntityKind;

    /// Current cell, or `None` while the agent is not placed.
    fn position(&self) -> Option<Cell>;

    /// Set or clear the agent's cell.
    fn set_position(&mut self, position: Option<Cell>);

    /// How many activations this agent has lived through.
    fn age(&self) -> Tick;

    /// Evaluate whether the agent can act this step.
    fn self_assess(&self) -> Vitality;

    /// Whether the agent should be removed.
    fn should_die(&self) -> bool {
        self.self_assess().death_cause().is_some()
    }
}
