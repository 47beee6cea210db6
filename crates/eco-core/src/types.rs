//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (row, col) cell address in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Whether this coordinate lies inside a `height` x `width` grid
    pub fn in_bounds(&self, height: usize, width: usize) -> bool {
        self.row >= 0
            && self.col >= 0
            && (self.row as usize) < height
            && (self.col as usize) < width
    }

    /// Chebyshev distance, the ring index of a Moore neighbourhood
    pub fn chebyshev_distance(&self, other: &Coordinate) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Kind of entity occupying a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Void,
    Obstacle,
    Plant,
    Organism,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 4] {
        [
            EntityKind::Void,
            EntityKind::Obstacle,
            EntityKind::Plant,
            EntityKind::Organism,
        ]
    }

    /// Single-character glyph used by text renderers
    pub fn symbol(&self) -> char {
        match self {
            EntityKind::Void => '.',
            EntityKind::Obstacle => '#',
            EntityKind::Plant => '*',
            EntityKind::Organism => 'o',
        }
    }

    /// Whether entities of this kind ever act during a tick
    pub fn is_active(&self) -> bool {
        matches!(self, EntityKind::Plant | EntityKind::Organism)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Void => "void",
            EntityKind::Obstacle => "obstacle",
            EntityKind::Plant => "plant",
            EntityKind::Organism => "organism",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_coordinate_offset() {
        let c = Coordinate::new(2, 3);
        assert_eq!(c.offset(-1, 1), Coordinate::new(1, 4));
    }

    #[test]
    fn test_in_bounds_edges() {
        assert!(Coordinate::new(0, 0).in_bounds(3, 4));
        assert!(Coordinate::new(2, 3).in_bounds(3, 4));
        assert!(!Coordinate::new(3, 0).in_bounds(3, 4));
        assert!(!Coordinate::new(0, 4).in_bounds(3, 4));
        assert!(!Coordinate::new(-1, 0).in_bounds(3, 4));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = Coordinate::new(0, 0);
        assert_eq!(a.chebyshev_distance(&Coordinate::new(1, 1)), 1);
        assert_eq!(a.chebyshev_distance(&Coordinate::new(-2, 1)), 2);
    }

    #[test]
    fn test_kind_symbols_are_distinct() {
        let symbols: std::collections::HashSet<char> =
            EntityKind::all().iter().map(|k| k.symbol()).collect();
        assert_eq!(symbols.len(), 4);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::Organism).unwrap();
        assert_eq!(json, "\"organism\"");
    }

    proptest! {
        #[test]
        fn in_bounds_matches_ranges(
            height in 1usize..20,
            width in 1usize..20,
            row in -5i32..25,
            col in -5i32..25,
        ) {
            let expected =
                row >= 0 && col >= 0 && (row as usize) < height && (col as usize) < width;
            prop_assert_eq!(Coordinate::new(row, col).in_bounds(height, width), expected);
        }
    }
}
