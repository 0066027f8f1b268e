use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::boundary::HexBoundary;
use super::coord::HecsCoord;
use crate::state::HeightMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub height: f32,
    pub boundary: HexBoundary,
}

/// Rectangular block of cells addressed by offset row/col but keyed by
/// `HecsCoord`. Cells outside the block do not exist and cannot be entered.
#[derive(Debug, Clone)]
pub struct HexMap {
    rows: usize,
    cols: usize,
    cells: HashMap<HecsCoord, Cell>,
}

impl HexMap {
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = HecsCoord::range_2d(HecsCoord::ORIGIN, rows, cols)
            .into_iter()
            .flatten()
            .map(|coord| (coord, Cell::default()))
            .collect();
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: HecsCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn cell(&self, coord: HecsCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn boundary(&self, coord: HecsCoord) -> HexBoundary {
        self.cell(coord).map(|cell| cell.boundary).unwrap_or_default()
    }

    pub fn set_height(&mut self, coord: HecsCoord, height: f32) {
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.height = height;
        }
    }

    /// Blocks the shared side from both cells so either can answer.
    pub fn block_edge(&mut self, from: HecsCoord, to: HecsCoord) {
        if let Some(cell) = self.cells.get_mut(&from) {
            cell.boundary.set_edge_with(from, to);
        }
        if let Some(cell) = self.cells.get_mut(&to) {
            cell.boundary.set_edge_with(to, from);
        }
    }

    /// Folds in boundary knowledge from elsewhere (usually a server map
    /// update). Edges are only ever added.
    pub fn merge_boundary(&mut self, coord: HecsCoord, boundary: &HexBoundary) {
        if let Some(cell) = self.cells.get_mut(&coord) {
            cell.boundary.merge_with(boundary);
        }
    }

    /// One-step movement check: `to` must exist, be adjacent to `from`, and
    /// neither cell may block the side they share.
    pub fn can_traverse(&self, from: HecsCoord, to: HecsCoord) -> bool {
        if !from.is_adjacent_to(to) {
            return false;
        }
        let Some(destination) = self.cell(to) else {
            return false;
        };
        !self.boundary(from).edge_with(from, to) && !destination.boundary.edge_with(to, from)
    }
}

impl HeightMap for HexMap {
    fn height(&self, coord: HecsCoord) -> f32 {
        self.cell(coord).map(|cell| cell.height).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_size() {
        assert_eq!(HexMap::new(0, 0).len(), 0);
        assert_eq!(HexMap::new(3, 4).len(), 12);
        let map = HexMap::new(5, 5);
        assert!(map.contains(HecsCoord::from_offset_coordinates(4, 4)));
        assert!(!map.contains(HecsCoord::from_offset_coordinates(5, 0)));
    }

    #[test]
    fn blocked_edge_stops_movement_both_ways() {
        let mut map = HexMap::new(4, 4);
        let from = HecsCoord::from_offset_coordinates(1, 1);
        let to = from.right();

        assert!(map.can_traverse(from, to));
        map.block_edge(from, to);
        assert!(!map.can_traverse(from, to));
        assert!(!map.can_traverse(to, from));
        assert!(map.can_traverse(from, from.left()));
    }

    #[test]
    fn one_sided_boundary_still_blocks() {
        let mut map = HexMap::new(4, 4);
        let from = HecsCoord::from_offset_coordinates(2, 2);
        let to = from.down_left();

        let mut server = HexBoundary::new();
        server.set_edge_with(to, from);
        map.merge_boundary(to, &server);

        assert!(!map.can_traverse(from, to));
    }

    #[test]
    fn cannot_leave_the_map_or_jump() {
        let map = HexMap::new(2, 2);
        let corner = HecsCoord::ORIGIN;
        assert!(!map.can_traverse(corner, corner.left()));
        assert!(!map.can_traverse(corner, HecsCoord::from_offset_coordinates(1, 1).right()));
    }

    #[test]
    fn heights_default_to_zero_off_map() {
        let mut map = HexMap::new(2, 2);
        let coord = HecsCoord::from_offset_coordinates(1, 0);
        map.set_height(coord, 0.75);
        assert_eq!(map.height(coord), 0.75);
        assert_eq!(map.height(HecsCoord::new(0, 40, 40)), 0.0);
    }
}
