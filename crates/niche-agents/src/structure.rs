//! Structure — a built artifact with a finite lifespan.
//!
//! Structures block recharge on their cell and, when reproduction is
//! configured to need one, enable breeding nearby. Each activation takes
//! one step off the remaining lifespan.

use niche_core::agent::Agent;
use niche_core::types::*;

/// Lifespan given to structures built without an explicit one.
pub const DEFAULT_LIFESPAN: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    id: AgentId,
    position: Option<Cell>,
    lifespan: u32,
    age: Tick,
}

impl Structure {
    pub fn new(id: AgentId, cell: Cell, lifespan: u32) -> Self {
        Self {
            id,
            position: Some(cell),
            lifespan,
            age: 0,
        }
    }

    /// Steps left before the structure is removed.
    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    /// Count down one step. Returns the vitality after the countdown.
    pub fn step(&mut self) -> Vitality {
        self.lifespan = self.lifespan.saturating_sub(1);
        self.age += 1;
        self.self_assess()
    }
}

impl Agent for Structure {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Structure
    }

    fn position(&self) -> Option<Cell> {
        self.position
    }

    fn set_position(&mut self, position: Option<Cell>) {
        self.position = position;
    }

    fn age(&self) -> Tick {
        self.age
    }

    fn self_assess(&self) -> Vitality {
        if self.lifespan == 0 {
            Vitality::Expired
        } else {
            Vitality::Viable
        }
    }
}
