//! The toroidal spatial-index capability the model relies on.
//!
//! The core only needs a handful of operations from a grid: Moore
//! neighborhoods with wraparound, per-cell occupant lists, and
//! place/move/remove. This is a trait rather than a concrete type so the
//! model can run on any grid backend that honours torus wraparound.

use crate::types::{AgentId, Cell, EntityKind, Occupant};

/// Toroidal 2D grid holding agent occupancy.
pub trait SpatialIndex {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Wrap signed coordinates onto the torus.
    fn wrap(&self, x: i64, y: i64) -> Cell {
        Cell::new(
            x.rem_euclid(self.width() as i64) as usize,
            y.rem_euclid(self.height() as i64) as usize,
        )
    }

    /// Moore neighborhood of `cell` with the given radius.
    ///
    /// Cells appear at most once even when the radius wraps all the way
    /// around a small grid.
    fn neighborhood(&self, cell: Cell, radius: usize, include_center: bool) -> Vec<Cell> {
        moore_neighborhood(self.width(), self.height(), cell, radius, include_center)
    }

    /// Everything currently placed on `cell`.
    fn occupants(&self, cell: Cell) -> &[Occupant];

    /// Place an occupant on a cell.
    fn place(&mut self, id: AgentId, kind: EntityKind, cell: Cell);

    /// Move an occupant between cells. Returns false if it was not found
    /// on `from`.
    fn move_to(&mut self, id: AgentId, from: Cell, to: Cell) -> bool;

    /// Remove an occupant from a cell. Returns false if it was not there.
    fn remove(&mut self, id: AgentId, cell: Cell) -> bool;

    /// Whether any occupant of the given kind sits on `cell`.
    fn contains_kind(&self, cell: Cell, kind: EntityKind) -> bool {
        self.occupants(cell).iter().any(|o| o.kind == kind)
    }
}

/// Moore neighborhood on a `width` x `height` torus.
///
/// Rings are visited from `-radius` to `+radius` on each axis; duplicates
/// produced by wraparound are skipped. The center is included only when
/// asked for.
pub fn moore_neighborhood(
    width: usize,
    height: usize,
    center: Cell,
    radius: usize,
    include_center: bool,
) -> Vec<Cell> {
    let r = radius as i64;
    let (w, h) = (width as i64, height as i64);
    let mut cells = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)).min(width * height));
    for dy in -r..=r {
        for dx in -r..=r {
            let cell = Cell::new(
                (center.x as i64 + dx).rem_euclid(w) as usize,
                (center.y as i64 + dy).rem_euclid(h) as usize,
            );
            if cell == center && !include_center {
                continue;
            }
            if !cells.contains(&cell) {
                cells.push(cell);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_one_has_eight_neighbors() {
        let cells = moore_neighborhood(10, 10, Cell::new(5, 5), 1, false);
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&Cell::new(5, 5)));
    }

    #[test]
    fn neighborhood_wraps_around_corners() {
        let cells = moore_neighborhood(10, 10, Cell::new(0, 0), 1, false);
        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&Cell::new(9, 9)));
        assert!(cells.contains(&Cell::new(9, 0)));
        assert!(cells.contains(&Cell::new(0, 9)));
    }

    #[test]
    fn tiny_grid_has_no_duplicates() {
        let cells = moore_neighborhood(2, 2, Cell::new(0, 0), 1, true);
        assert_eq!(cells.len(), 4);
        let without_center = moore_neighborhood(2, 2, Cell::new(0, 0), 3, false);
        assert_eq!(without_center.len(), 3);
    }

    #[test]
    fn radius_two_includes_center_on_request() {
        let cells = moore_neighborhood(20, 20, Cell::new(10, 10), 2, true);
        assert_eq!(cells.len(), 25);
        assert!(cells.contains(&Cell::new(10, 10)));
    }
}
