//! Structure kinds, requests, footprints and placed instances.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::grid::Pos;

/// Kinds of structures a settlement can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// Central hall, one per settlement
    TownHall,
    House,
    Barracks,
    ArcherTower,
    Farm,
    Bunker,
    FishingHut,
    Igloo,
    TreeHouse,
}

impl StructureKind {
    /// Display name for the structure
    pub fn display_name(&self) -> &'static str {
        match self {
            StructureKind::TownHall => "town hall",
            StructureKind::House => "house",
            StructureKind::Barracks => "barracks",
            StructureKind::ArcherTower => "archer tower",
            StructureKind::Farm => "farm",
            StructureKind::Bunker => "bunker",
            StructureKind::FishingHut => "fishing hut",
            StructureKind::Igloo => "igloo",
            StructureKind::TreeHouse => "tree house",
        }
    }

    /// Default footprint (width, depth) in cells
    pub fn default_footprint(&self) -> (i32, i32) {
        match self {
            StructureKind::TownHall => (15, 15),
            StructureKind::House => (7, 9),
            StructureKind::Barracks => (8, 8),
            StructureKind::ArcherTower => (5, 5),
            StructureKind::Farm => (9, 7),
            StructureKind::Bunker => (6, 6),
            StructureKind::FishingHut => (5, 7),
            StructureKind::Igloo => (7, 7),
            StructureKind::TreeHouse => (6, 6),
        }
    }
}

/// Which footprint edge carries the entrance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorSide {
    /// Edge at the smallest z
    North,
    /// Edge at the largest z
    #[default]
    South,
    /// Edge at the largest x
    East,
    /// Edge at the smallest x
    West,
}

impl DoorSide {
    /// Midpoint cell of this edge, inside the footprint
    pub fn door_cell(&self, footprint: &Footprint) -> Pos {
        let Footprint { x, z, width, depth } = *footprint;
        match self {
            DoorSide::North => Pos::new(x + width / 2, z),
            DoorSide::South => Pos::new(x + width / 2, z + depth - 1),
            DoorSide::East => Pos::new(x + width - 1, z + depth / 2),
            DoorSide::West => Pos::new(x, z + depth / 2),
        }
    }
}

/// An axis-aligned rectangle of cells: `[x, x + width) × [z, z + depth)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub x: i32,
    pub z: i32,
    pub width: i32,
    pub depth: i32,
}

impl Footprint {
    pub fn new(x: i32, z: i32, width: i32, depth: i32) -> Self {
        Self { x, z, width, depth }
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.width
    }

    pub fn max_z(&self) -> i32 {
        self.z + self.depth
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x < self.max_x() && pos.z >= self.z && pos.z < self.max_z()
    }

    /// Grow by `margin` cells on every side
    pub fn expanded(&self, margin: i32) -> Footprint {
        Footprint::new(
            self.x - margin,
            self.z - margin,
            self.width + 2 * margin,
            self.depth + 2 * margin,
        )
    }

    /// Strict intersection: rectangles that only touch along an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Footprint) -> bool {
        !(self.max_x() <= other.x
            || other.max_x() <= self.x
            || self.max_z() <= other.z
            || other.max_z() <= self.z)
    }

    /// Whether the whole rectangle lies in `[0, width) × [0, height)`
    pub fn within(&self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.z >= 0 && self.max_x() <= width && self.max_z() <= height
    }

    /// Every covered cell, x outer and z inner
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (self.x..self.max_x()).flat_map(move |x| (self.z..self.max_z()).map(move |z| Pos::new(x, z)))
    }

    /// Cells of the one-cell ring just outside the rectangle
    pub fn ring(&self) -> Vec<Pos> {
        let outer = self.expanded(1);
        outer.cells().filter(|pos| !self.contains(*pos)).collect()
    }
}

/// A request to place `count` instances of a structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureRequest {
    pub kind: StructureKind,
    pub width: i32,
    pub depth: i32,
    pub count: usize,
    /// Entrance offset from the footprint origin; the placer's door side is
    /// used when absent
    #[serde(default)]
    pub door: Option<(i32, i32)>,
}

impl StructureRequest {
    pub fn new(kind: StructureKind, width: i32, depth: i32, count: usize) -> Self {
        Self {
            kind,
            width,
            depth,
            count,
            door: None,
        }
    }

    /// Put the entrance at a fixed offset inside the footprint
    pub fn with_door(mut self, dx: i32, dz: i32) -> Self {
        self.door = Some((dx, dz));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.depth <= 0 {
            return Err(self.malformed(format!(
                "footprint {}x{} must be positive",
                self.width, self.depth
            )));
        }
        if let Some((dx, dz)) = self.door {
            if dx < 0 || dz < 0 || dx >= self.width || dz >= self.depth {
                return Err(self.malformed(format!(
                    "door offset ({}, {}) lies outside the {}x{} footprint",
                    dx, dz, self.width, self.depth
                )));
            }
        }
        Ok(())
    }

    fn malformed(&self, reason: String) -> LayoutError {
        LayoutError::MalformedRequest {
            kind: self.kind.display_name().to_string(),
            reason,
        }
    }
}

/// A structure whose footprint has been reserved on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedStructure {
    /// Sequence number in placement order
    pub id: usize,
    pub kind: StructureKind,
    pub footprint: Footprint,
    /// The GOAL cell marking the door
    pub entrance: Pos,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_is_strict() {
        let a = Footprint::new(0, 0, 3, 3);
        assert!(a.intersects(&Footprint::new(2, 2, 3, 3)));
        // Touching along an edge is not an overlap
        assert!(!a.intersects(&Footprint::new(3, 0, 3, 3)));
        assert!(!a.intersects(&Footprint::new(0, 3, 3, 3)));
        assert!(!a.intersects(&Footprint::new(10, 10, 1, 1)));
    }

    #[test]
    fn test_expanded_gap_boundary() {
        let a = Footprint::new(0, 0, 3, 3);
        // A gap of 1 keeps one free column between them
        assert!(a.expanded(1).intersects(&Footprint::new(3, 0, 2, 2)));
        assert!(!a.expanded(1).intersects(&Footprint::new(4, 0, 2, 2)));
    }

    #[test]
    fn test_footprint_cells_and_ring() {
        let fp = Footprint::new(1, 1, 2, 3);
        assert_eq!(fp.cells().count(), 6);
        assert!(fp.cells().all(|p| fp.contains(p)));

        let ring = fp.ring();
        assert_eq!(ring.len(), 4 * 5 - 6);
        assert!(ring.iter().all(|p| !fp.contains(*p)));
        assert!(ring.contains(&Pos::new(0, 0)));
        assert!(ring.contains(&Pos::new(3, 4)));
    }

    #[test]
    fn test_door_sides() {
        let fp = Footprint::new(2, 4, 5, 3);
        assert_eq!(DoorSide::North.door_cell(&fp), Pos::new(4, 4));
        assert_eq!(DoorSide::South.door_cell(&fp), Pos::new(4, 6));
        assert_eq!(DoorSide::East.door_cell(&fp), Pos::new(6, 5));
        assert_eq!(DoorSide::West.door_cell(&fp), Pos::new(2, 5));
        for side in [DoorSide::North, DoorSide::South, DoorSide::East, DoorSide::West] {
            assert!(fp.contains(side.door_cell(&fp)));
        }
    }

    #[test]
    fn test_request_validation() {
        assert!(StructureRequest::new(StructureKind::House, 3, 3, 1).validate().is_ok());
        assert!(matches!(
            StructureRequest::new(StructureKind::House, 0, 3, 1).validate(),
            Err(LayoutError::MalformedRequest { .. })
        ));
        assert!(StructureRequest::new(StructureKind::House, 3, 3, 1)
            .with_door(2, 2)
            .validate()
            .is_ok());
        assert!(StructureRequest::new(StructureKind::House, 3, 3, 1)
            .with_door(3, 0)
            .validate()
            .is_err());
    }
}
