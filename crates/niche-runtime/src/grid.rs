//! The default spatial index: a wrapped width x height lattice.
//!
//! One occupant list per cell. Several occupants may share a cell; the
//! model decides whether organisms are allowed to stack.

use niche_core::spatial::SpatialIndex;
use niche_core::types::{AgentId, Cell, EntityKind, Occupant};

#[derive(Debug, Clone)]
pub struct TorusGrid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Occupant>>,
}

impl TorusGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Vec::new(); width * height],
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell.y * self.width + cell.x
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.width * self.height).map(move |i| Cell::new(i % self.width, i / self.width))
    }

    /// Cells with no occupant of `kind`.
    pub fn cells_without(&self, kind: EntityKind) -> Vec<Cell> {
        self.cells().filter(|c| !self.contains_kind(*c, kind)).collect()
    }
}

impl SpatialIndex for TorusGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn occupants(&self, cell: Cell) -> &[Occupant] {
        &self.cells[self.index(cell)]
    }

    fn place(&mut self, id: AgentId, kind: EntityKind, cell: Cell) {
        let i = self.index(cell);
        self.cells[i].push(Occupant { id, kind });
    }

    fn move_to(&mut self, id: AgentId, from: Cell, to: Cell) -> bool {
        let i = self.index(from);
        match self.cells[i].iter().position(|o| o.id == id) {
            Some(pos) => {
                let occupant = self.cells[i].remove(pos);
                let j = self.index(to);
                self.cells[j].push(occupant);
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: AgentId, cell: Cell) -> bool {
        let i = self.index(cell);
        let before = self.cells[i].len();
        self.cells[i].retain(|o| o.id != id);
        self.cells[i].len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_move_remove() {
        let mut grid = TorusGrid::new(3, 3);
        let a = AgentId(1);
        grid.place(a, EntityKind::Organism, Cell::new(0, 0));
        assert!(grid.contains_kind(Cell::new(0, 0), EntityKind::Organism));
        assert!(grid.move_to(a, Cell::new(0, 0), Cell::new(2, 2)));
        assert!(grid.occupants(Cell::new(0, 0)).is_empty());
        assert!(!grid.move_to(a, Cell::new(0, 0), Cell::new(1, 1)));
        assert!(grid.remove(a, Cell::new(2, 2)));
        assert!(!grid.remove(a, Cell::new(2, 2)));
    }

    #[test]
    fn wrap_is_toroidal() {
        let grid = TorusGrid::new(4, 5);
        assert_eq!(grid.wrap(-1, -1), Cell::new(3, 4));
        assert_eq!(grid.wrap(4, 5), Cell::new(0, 0));
    }

    #[test]
    fn free_cells_exclude_kind() {
        let mut grid = TorusGrid::new(2, 2);
        grid.place(AgentId(1), EntityKind::Organism, Cell::new(1, 0));
        grid.place(AgentId(2), EntityKind::Structure, Cell::new(0, 1));
        let free = grid.cells_without(EntityKind::Organism);
        assert_eq!(free.len(), 3);
        assert!(!free.contains(&Cell::new(1, 0)));
    }
}
