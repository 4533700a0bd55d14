//! Shortest 4-connected paths on the reservation grid.
//!
//! Two searches share the same neighbour rules (in bounds, not OBSTACLE;
//! GOAL and ROAD cells are traversable) and the same uniform step cost:
//! - **A\***: Manhattan heuristic, min-heap on `f = g + h`, ties broken by
//!   the smaller `(x, z)` coordinate
//! - **BFS**: FIFO frontier, used as a cross-check and where an unweighted
//!   search is enough
//!
//! [`PathFinder::connect_goals`] links every GOAL cell into one road network.

mod astar;
mod bfs;
mod network;

pub use astar::astar;
pub use bfs::bfs;
pub use network::{Connection, ConnectionPolicy, ConnectionReport, FailedConnection};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::grid::{Grid, Pos};

/// Which search to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    #[default]
    AStar,
    Bfs,
}

/// A path from its first cell to its last, both endpoints included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Pos>,
}

impl Path {
    pub fn cells(&self) -> &[Pos] {
        &self.cells
    }

    /// Number of cells, endpoints included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of unit moves
    pub fn cost(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Pos> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Pos> {
        self.cells.last().copied()
    }

    /// Cells strictly between the two endpoints
    pub fn interior(&self) -> &[Pos] {
        if self.cells.len() <= 2 {
            return &[];
        }
        &self.cells[1..self.cells.len() - 1]
    }

    /// Whether every step is a single axis-aligned move onto a passable cell
    pub fn is_valid_on(&self, grid: &Grid) -> bool {
        self.cells.windows(2).all(|w| w[0].is_adjacent(w[1]))
            && self.cells.iter().all(|pos| grid.is_passable(*pos))
    }
}

/// Rebuild the path ending at `goal` by following predecessor links back to
/// `start`. Returns `None` if the chain is broken.
pub fn reconstruct(came_from: &HashMap<Pos, Pos>, start: Pos, goal: Pos) -> Option<Path> {
    let mut cells = vec![goal];
    let mut current = goal;

    while current != start {
        current = *came_from.get(&current)?;
        cells.push(current);
        // A cycle in the links would otherwise never end
        if cells.len() > came_from.len() + 1 {
            return None;
        }
    }

    cells.reverse();
    Some(Path { cells })
}

/// Runs the configured search
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder {
    pub strategy: SearchStrategy,
}

impl PathFinder {
    pub fn new(strategy: SearchStrategy) -> Self {
        Self { strategy }
    }

    /// Shortest path from `start` to `goal`
    pub fn find_path(&self, grid: &Grid, start: Pos, goal: Pos) -> Result<Path> {
        match self.strategy {
            SearchStrategy::AStar => astar(grid, start, goal),
            SearchStrategy::Bfs => bfs(grid, start, goal),
        }
    }
}

/// Shared endpoint check for both searches
fn check_endpoints(grid: &Grid, start: Pos, goal: Pos) -> Result<()> {
    for pos in [start, goal] {
        if !grid.in_bounds(pos.x, pos.z) {
            return Err(LayoutError::OutOfBounds { x: pos.x, z: pos.z });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;

    fn walled_grid() -> Grid {
        // 5x5 with a wall at x = 2 and a single gap at (2, 2)
        let mut grid = Grid::new(5, 5).unwrap();
        for z in 0..5 {
            if z != 2 {
                grid.set_cell(2, z, CellState::Obstacle).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_corner_to_corner() {
        let grid = Grid::new(10, 10).unwrap();
        for finder in [PathFinder::new(SearchStrategy::AStar), PathFinder::new(SearchStrategy::Bfs)] {
            let path = finder.find_path(&grid, Pos::new(0, 0), Pos::new(9, 9)).unwrap();
            assert_eq!(path.len(), 19);
            assert_eq!(path.cost(), 18);
            assert_eq!(path.start(), Some(Pos::new(0, 0)));
            assert_eq!(path.end(), Some(Pos::new(9, 9)));
            assert!(path.is_valid_on(&grid));
        }
    }

    #[test]
    fn test_route_through_wall_gap() {
        let grid = walled_grid();
        for strategy in [SearchStrategy::AStar, SearchStrategy::Bfs] {
            let path = PathFinder::new(strategy)
                .find_path(&grid, Pos::new(0, 2), Pos::new(4, 2))
                .unwrap();
            assert!(path.cells().contains(&Pos::new(2, 2)));
            assert_eq!(path.cost(), 4);
            assert!(path.is_valid_on(&grid));
        }
    }

    #[test]
    fn test_astar_matches_bfs_length() {
        let grid = Grid::new(12, 9).unwrap();
        let points: Vec<Pos> = grid.positions().step_by(7).collect();
        for &a in &points {
            for &b in &points {
                let x = astar(&grid, a, b).unwrap();
                let y = bfs(&grid, a, b).unwrap();
                assert_eq!(x.len(), y.len(), "{} -> {}", a, b);
                assert_eq!(x.cost() as u32, a.manhattan(b));
            }
        }
    }

    #[test]
    fn test_astar_matches_bfs_with_obstacles() {
        let mut grid = Grid::new(9, 9).unwrap();
        for z in 0..8 {
            grid.set_cell(3, z, CellState::Obstacle).unwrap();
        }
        for z in 1..9 {
            grid.set_cell(6, z, CellState::Obstacle).unwrap();
        }

        let start = Pos::new(0, 0);
        let goal = Pos::new(8, 0);
        let x = astar(&grid, start, goal).unwrap();
        let y = bfs(&grid, start, goal).unwrap();
        assert_eq!(x.len(), y.len());
        assert!(x.cost() as u32 > start.manhattan(goal));
        assert!(x.is_valid_on(&grid));
        assert!(y.is_valid_on(&grid));
    }

    #[test]
    fn test_reconstruct_is_repeatable() {
        let mut came_from = HashMap::new();
        came_from.insert(Pos::new(1, 0), Pos::new(0, 0));
        came_from.insert(Pos::new(1, 1), Pos::new(1, 0));
        came_from.insert(Pos::new(2, 1), Pos::new(1, 1));

        let first = reconstruct(&came_from, Pos::new(0, 0), Pos::new(2, 1)).unwrap();
        let second = reconstruct(&came_from, Pos::new(0, 0), Pos::new(2, 1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.cells(),
            &[Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1), Pos::new(2, 1)]
        );
    }

    #[test]
    fn test_reconstruct_broken_chain() {
        let mut came_from = HashMap::new();
        came_from.insert(Pos::new(2, 0), Pos::new(1, 0));
        assert!(reconstruct(&came_from, Pos::new(0, 0), Pos::new(2, 0)).is_none());

        let mut cycle = HashMap::new();
        cycle.insert(Pos::new(1, 0), Pos::new(2, 0));
        cycle.insert(Pos::new(2, 0), Pos::new(1, 0));
        assert!(reconstruct(&cycle, Pos::new(0, 0), Pos::new(1, 0)).is_none());
    }

    #[test]
    fn test_endpoints_out_of_bounds() {
        let grid = Grid::new(4, 4).unwrap();
        assert_eq!(
            astar(&grid, Pos::new(0, 0), Pos::new(4, 0)),
            Err(LayoutError::OutOfBounds { x: 4, z: 0 })
        );
        assert_eq!(
            bfs(&grid, Pos::new(-1, 0), Pos::new(0, 0)),
            Err(LayoutError::OutOfBounds { x: -1, z: 0 })
        );
    }

    #[test]
    fn test_path_interior() {
        let grid = Grid::new(5, 1).unwrap();
        let path = astar(&grid, Pos::new(0, 0), Pos::new(4, 0)).unwrap();
        assert_eq!(path.interior(), &[Pos::new(1, 0), Pos::new(2, 0), Pos::new(3, 0)]);

        let single = astar(&grid, Pos::new(2, 0), Pos::new(2, 0)).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.cost(), 0);
        assert!(single.interior().is_empty());
    }
}
