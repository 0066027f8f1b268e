use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::coord::{HecsCoord, HexDirection};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        const UP_RIGHT = 1 << 0;
        const RIGHT = 1 << 1;
        const DOWN_RIGHT = 1 << 2;
        const DOWN_LEFT = 1 << 3;
        const LEFT = 1 << 4;
        const UP_LEFT = 1 << 5;
    }
}

impl From<HexDirection> for Edges {
    fn from(direction: HexDirection) -> Self {
        Self::from_bits_retain(1 << direction.index())
    }
}

/// Blocked edges of a single hex cell, one bit per side. The two high bits
/// have no meaning but survive a serialize/deserialize cycle untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct HexBoundary {
    edges: Edges,
}

impl Default for HexBoundary {
    fn default() -> Self {
        Self {
            edges: Edges::empty(),
        }
    }
}

impl From<u8> for HexBoundary {
    fn from(value: u8) -> Self {
        Self::from_binary(value)
    }
}

impl From<HexBoundary> for u8 {
    fn from(boundary: HexBoundary) -> Self {
        boundary.serialize()
    }
}

impl HexBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_binary(value: u8) -> Self {
        Self {
            edges: Edges::from_bits_retain(value),
        }
    }

    pub fn edges(&self) -> Edges {
        self.edges
    }

    pub fn up_right(&self) -> bool {
        self.edges.contains(Edges::UP_RIGHT)
    }

    pub fn right(&self) -> bool {
        self.edges.contains(Edges::RIGHT)
    }

    pub fn down_right(&self) -> bool {
        self.edges.contains(Edges::DOWN_RIGHT)
    }

    pub fn down_left(&self) -> bool {
        self.edges.contains(Edges::DOWN_LEFT)
    }

    pub fn left(&self) -> bool {
        self.edges.contains(Edges::LEFT)
    }

    pub fn up_left(&self) -> bool {
        self.edges.contains(Edges::UP_LEFT)
    }

    pub fn edge(&self, direction: HexDirection) -> bool {
        self.edges.contains(Edges::from(direction))
    }

    pub fn set_edge(&mut self, direction: HexDirection, blocked: bool) {
        self.edges.set(Edges::from(direction), blocked);
    }

    /// Whether the side shared between the cell at `loc` and `neighbor` is
    /// blocked. Non-adjacent pairs are never blocked.
    pub fn edge_with(&self, loc: HecsCoord, neighbor: HecsCoord) -> bool {
        loc.direction_of(neighbor)
            .is_some_and(|direction| self.edge(direction))
    }

    pub fn set_edge_with(&mut self, loc: HecsCoord, neighbor: HecsCoord) {
        if let Some(direction) = loc.direction_of(neighbor) {
            self.set_edge(direction, true);
        }
    }

    pub fn clear_edge_with(&mut self, loc: HecsCoord, neighbor: HecsCoord) {
        if let Some(direction) = loc.direction_of(neighbor) {
            self.set_edge(direction, false);
        }
    }

    pub fn all_blocked(&mut self) {
        self.edges = Edges::from_bits_retain(0xFF);
    }

    pub fn clear(&mut self) {
        self.edges = Edges::empty();
    }

    pub fn is_clear(&self) -> bool {
        self.edges.bits() == 0
    }

    pub fn merge_with(&mut self, other: &HexBoundary) {
        self.edges |= other.edges;
    }

    pub fn serialize(&self) -> u8 {
        self.edges.bits()
    }

    /// Overwrites every edge.
    pub fn deserialize(&mut self, value: u8) {
        self.edges = Edges::from_bits_retain(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_with_neighbor() {
        let loc = HecsCoord::new(1, 2, 2);
        let mut boundary = HexBoundary::new();

        boundary.set_edge_with(loc, loc.right());
        assert!(boundary.right());
        assert!(boundary.edge_with(loc, loc.right()));
        assert!(!boundary.edge_with(loc, loc.left()));

        boundary.clear_edge_with(loc, loc.right());
        assert!(boundary.is_clear());
    }

    #[test]
    fn non_adjacent_is_noop() {
        let loc = HecsCoord::new(0, 1, 1);
        let far = HecsCoord::new(0, 4, 4);
        let mut boundary = HexBoundary::from_binary(0b0000_0101);

        boundary.set_edge_with(loc, far);
        assert_eq!(boundary.serialize(), 0b0000_0101);
        boundary.clear_edge_with(loc, far);
        assert_eq!(boundary.serialize(), 0b0000_0101);
        assert!(!boundary.edge_with(loc, far));
    }

    #[test]
    fn merge_is_bitwise_or() {
        let mut local = HexBoundary::from_binary(0b0000_0011);
        let server = HexBoundary::from_binary(0b0010_0001);
        local.merge_with(&server);
        assert_eq!(local.serialize(), 0b0010_0011);
    }

    #[test]
    fn high_bits_preserved() {
        for value in [0u8, 0x3F, 0x40, 0x80, 0xC1, 0xFF] {
            assert_eq!(HexBoundary::from_binary(value).serialize(), value);
        }

        let mut boundary = HexBoundary::from_binary(0xC0);
        boundary.set_edge(HexDirection::Left, true);
        assert_eq!(boundary.serialize(), 0xD0);
    }

    #[test]
    fn all_blocked_covers_every_side() {
        let mut boundary = HexBoundary::new();
        boundary.all_blocked();
        assert_eq!(boundary.serialize(), 0xFF);
        for direction in HexDirection::ALL {
            assert!(boundary.edge(direction));
        }
        boundary.clear();
        assert!(boundary.is_clear());
    }

    #[test]
    fn json_is_a_single_number() {
        let boundary = HexBoundary::from_binary(0b0001_0010);
        assert_eq!(serde_json::to_string(&boundary).unwrap(), "18");
        let parsed: HexBoundary = serde_json::from_str("18").unwrap();
        assert_eq!(parsed, boundary);
    }
}
