//! The reservation grid over the build footprint.
//!
//! Cells are stored column-major: all `z` for `x = 0`, then `x = 1`, and so
//! on. Every scan the grid exposes ([`Grid::goal_cells`], [`Grid::cells_with`])
//! walks in that order, x outer and z inner, which fixes the order in which
//! goals are connected downstream.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    /// Free ground
    #[default]
    Empty,
    /// Reserved by a structure footprint
    Obstacle,
    /// Part of the road network
    Road,
    /// A structure entrance, used as a path endpoint
    Goal,
}

impl CellState {
    /// Map glyph used by [`Grid::render`]
    pub fn glyph(&self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Obstacle => '#',
            CellState::Road => '=',
            CellState::Goal => '@',
        }
    }
}

/// A local grid coordinate.
///
/// Ordering is lexicographic on `(x, z)`; the path search uses it to break
/// ties between equally promising cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub z: i32,
}

impl Pos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Manhattan distance to another cell
    pub fn manhattan(&self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// The four axis-aligned neighbours, in +x, -x, +z, -z order
    pub fn neighbors(&self) -> [Pos; 4] {
        [
            Pos::new(self.x + 1, self.z),
            Pos::new(self.x - 1, self.z),
            Pos::new(self.x, self.z + 1),
            Pos::new(self.x, self.z - 1),
        ]
    }

    /// Whether `other` is exactly one step away along one axis
    pub fn is_adjacent(&self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// The 2D cell-state map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a fully empty grid. Both dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(LayoutError::InvalidDimension { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![CellState::Empty; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.width && z < self.height
    }

    fn index(&self, x: i32, z: i32) -> Result<usize> {
        if !self.in_bounds(x, z) {
            return Err(LayoutError::OutOfBounds { x, z });
        }
        Ok(x as usize * self.height as usize + z as usize)
    }

    /// Overwrite a cell unconditionally.
    ///
    /// Callers own the transition rules: OBSTACLE and GOAL are never
    /// replaced by ROAD. Use [`Grid::mark_road`] when laying roads.
    pub fn set_cell(&mut self, x: i32, z: i32, state: CellState) -> Result<()> {
        let idx = self.index(x, z)?;
        self.cells[idx] = state;
        Ok(())
    }

    pub fn get_cell(&self, x: i32, z: i32) -> Result<CellState> {
        let idx = self.index(x, z)?;
        Ok(self.cells[idx])
    }

    /// Look up a cell, `None` when out of bounds
    pub fn get(&self, pos: Pos) -> Option<CellState> {
        self.get_cell(pos.x, pos.z).ok()
    }

    pub fn is_obstacle(&self, x: i32, z: i32) -> bool {
        self.get_cell(x, z) == Ok(CellState::Obstacle)
    }

    pub fn is_goal(&self, x: i32, z: i32) -> bool {
        self.get_cell(x, z) == Ok(CellState::Goal)
    }

    /// Whether a path may step onto this cell
    pub fn is_passable(&self, pos: Pos) -> bool {
        matches!(
            self.get(pos),
            Some(CellState::Empty | CellState::Road | CellState::Goal)
        )
    }

    /// Turn an EMPTY cell into ROAD. Returns whether the cell changed.
    pub fn mark_road(&mut self, pos: Pos) -> bool {
        match self.index(pos.x, pos.z) {
            Ok(idx) if self.cells[idx] == CellState::Empty => {
                self.cells[idx] = CellState::Road;
                true
            }
            _ => false,
        }
    }

    /// All goal cells in scan order (x outer, z inner)
    pub fn goal_cells(&self) -> Vec<Pos> {
        self.cells_with(CellState::Goal)
    }

    /// All cells in a given state, in scan order (x outer, z inner)
    pub fn cells_with(&self, state: CellState) -> Vec<Pos> {
        self.positions()
            .filter(|pos| self.get(*pos) == Some(state))
            .collect()
    }

    /// Number of cells in a given state
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| **c == state).count()
    }

    /// Every coordinate in scan order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |z| Pos::new(x, z)))
    }

    /// ASCII map, one line per z row with x increasing left to right
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for z in 0..self.height {
            for x in 0..self.width {
                let state = self.get(Pos::new(x, z)).unwrap_or_default();
                out.push(state.glyph());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 4).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.count(CellState::Empty), 40);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Grid::new(0, 5),
            Err(LayoutError::InvalidDimension { width: 0, height: 5 })
        );
        assert!(Grid::new(5, -1).is_err());
    }

    #[test]
    fn test_cell_access() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_cell(2, 3, CellState::Obstacle).unwrap();
        assert_eq!(grid.get_cell(2, 3), Ok(CellState::Obstacle));
        assert!(grid.is_obstacle(2, 3));
        assert!(!grid.is_goal(2, 3));

        assert_eq!(grid.get_cell(5, 0), Err(LayoutError::OutOfBounds { x: 5, z: 0 }));
        assert_eq!(grid.get_cell(0, -1), Err(LayoutError::OutOfBounds { x: 0, z: -1 }));
        assert!(grid.set_cell(-1, 0, CellState::Road).is_err());
    }

    #[test]
    fn test_predicates_out_of_bounds() {
        let grid = Grid::new(3, 3).unwrap();
        assert!(!grid.in_bounds(3, 0));
        assert!(!grid.is_obstacle(3, 0));
        assert!(!grid.is_goal(-1, -1));
        assert!(!grid.is_passable(Pos::new(3, 3)));
    }

    #[test]
    fn test_goal_cells_scan_order() {
        let mut grid = Grid::new(4, 4).unwrap();
        grid.set_cell(3, 0, CellState::Goal).unwrap();
        grid.set_cell(0, 3, CellState::Goal).unwrap();
        grid.set_cell(0, 1, CellState::Goal).unwrap();
        grid.set_cell(2, 2, CellState::Goal).unwrap();

        assert_eq!(
            grid.goal_cells(),
            vec![Pos::new(0, 1), Pos::new(0, 3), Pos::new(2, 2), Pos::new(3, 0)]
        );
    }

    #[test]
    fn test_mark_road_respects_reservations() {
        let mut grid = Grid::new(3, 1).unwrap();
        grid.set_cell(0, 0, CellState::Obstacle).unwrap();
        grid.set_cell(1, 0, CellState::Goal).unwrap();

        assert!(!grid.mark_road(Pos::new(0, 0)));
        assert!(!grid.mark_road(Pos::new(1, 0)));
        assert!(grid.mark_road(Pos::new(2, 0)));
        assert!(!grid.mark_road(Pos::new(2, 0)));
        assert!(!grid.mark_road(Pos::new(7, 0)));

        assert_eq!(grid.get_cell(0, 0), Ok(CellState::Obstacle));
        assert_eq!(grid.get_cell(1, 0), Ok(CellState::Goal));
        assert_eq!(grid.get_cell(2, 0), Ok(CellState::Road));
    }

    #[test]
    fn test_render() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set_cell(0, 0, CellState::Obstacle).unwrap();
        grid.set_cell(1, 0, CellState::Goal).unwrap();
        grid.set_cell(2, 1, CellState::Road).unwrap();
        assert_eq!(grid.render(), "#@.\n..=\n");
    }

    #[test]
    fn test_pos_helpers() {
        let a = Pos::new(1, 1);
        assert_eq!(a.manhattan(Pos::new(4, -1)), 5);
        assert!(a.is_adjacent(Pos::new(1, 2)));
        assert!(!a.is_adjacent(Pos::new(2, 2)));
        assert!(Pos::new(0, 9) < Pos::new(1, 0));
    }

    #[test]
    fn test_snapshot_json() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_cell(1, 0, CellState::Goal).unwrap();
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json["width"], 2);
        assert_eq!(json["height"], 2);
        assert_eq!(json["cells"].as_array().map(Vec::len), Some(4));
    }
}
