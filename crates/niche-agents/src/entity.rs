//! The tagged union the model stores in its registry.

use crate::organism::Organism;
use crate::structure::Structure;
use crate::tile::Tile;
use niche_core::agent::Agent;
use niche_core::types::*;

#[derive(Debug, Clone)]
pub enum Entity {
    Organism(Organism),
    Structure(Structure),
    Tile(Tile),
}

impl Entity {
    pub fn as_organism(&self) -> Option<&Organism> {
        match self {
            Entity::Organism(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_organism_mut(&mut self) -> Option<&mut Organism> {
        match self {
            Entity::Organism(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Entity::Structure(s) => Some(s),
            _ => None,
        }
    }

    fn agent(&self) -> &dyn Agent {
        match self {
            Entity::Organism(o) => o,
            Entity::Structure(s) => s,
            Entity::Tile(t) => t,
        }
    }

    fn agent_mut(&mut self) -> &mut dyn Agent {
        match self {
            Entity::Organism(o) => o,
            Entity::Structure(s) => s,
            Entity::Tile(t) => t,
        }
    }
}

impl Agent for Entity {
    fn id(&self) -> AgentId {
        self.agent().id()
    }

    fn kind(&self) -> EntityKind {
        self.agent().kind()
    }

    fn position(&self) -> Option<Cell> {
        self.agent().position()
    }

    fn set_position(&mut self, position: Option<Cell>) {
        self.agent_mut().set_position(position)
    }

    fn age(&self) -> Tick {
        self.agent().age()
    }

    fn self_assess(&self) -> Vitality {
        self.agent().self_assess()
    }
}

impl From<Organism> for Entity {
    fn from(o: Organism) -> Self {
        Entity::Organism(o)
    }
}

impl From<Structure> for Entity {
    fn from(s: Structure) -> Self {
        Entity::Structure(s)
    }
}

impl From<Tile> for Entity {
    fn from(t: Tile) -> Self {
        Entity::Tile(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_delegates_to_inner_agent() {
        let e: Entity = Structure::new(AgentId(4), Cell::new(2, 3), 5).into();
        assert_eq!(e.id(), AgentId(4));
        assert_eq!(e.kind(), EntityKind::Structure);
        assert_eq!(e.position(), Some(Cell::new(2, 3)));
        assert!(e.as_organism().is_none());
        assert!(e.as_structure().is_some());
    }

    #[test]
    fn tiles_never_die() {
        let mut e: Entity = Tile::new(AgentId(1), Cell::new(0, 0)).into();
        e.set_position(None);
        assert_eq!(e.self_assess(), Vitality::Viable);
    }
}
