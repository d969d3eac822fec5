//! A passive marker occupying one cell.

use niche_core::agent::Agent;
use niche_core::types::*;

/// A tile never acts and never dies on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: AgentId,
    position: Option<Cell>,
    age: Tick,
}

impl Tile {
    pub fn new(id: AgentId, cell: Cell) -> Self {
        Self {
            id,
            position: Some(cell),
            age: 0,
        }
    }

    pub fn step(&mut self) {
        self.age += 1;
    }
}

impl Agent for Tile {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Tile
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
        Vitality::Viable
    }
}
