//! Breadth-first search with the same neighbour rules as A*.

use std::collections::{HashMap, VecDeque};

use crate::error::{LayoutError, Result};
use crate::grid::{Grid, Pos};

use super::{check_endpoints, reconstruct, Path};

/// Shortest path by move count, without a heuristic
pub fn bfs(grid: &Grid, start: Pos, goal: Pos) -> Result<Path> {
    check_endpoints(grid, start, goal)?;

    let mut queue = VecDeque::from([start]);
    let mut came_from: HashMap<Pos, Pos> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return reconstruct(&came_from, start, goal)
                .ok_or(LayoutError::NoPathFound { from: start, to: goal });
        }

        for next in current.neighbors() {
            if next == start || came_from.contains_key(&next) || !grid.is_passable(next) {
                continue;
            }
            came_from.insert(next, current);
            queue.push_back(next);
        }
    }

    Err(LayoutError::NoPathFound { from: start, to: goal })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;

    #[test]
    fn test_bfs_detour() {
        // Wall across the middle row except the last column
        let mut grid = Grid::new(4, 3).unwrap();
        for x in 0..3 {
            grid.set_cell(x, 1, CellState::Obstacle).unwrap();
        }

        let path = bfs(&grid, Pos::new(0, 0), Pos::new(0, 2)).unwrap();
        assert_eq!(path.cost(), 8);
        assert!(path.cells().contains(&Pos::new(3, 1)));
        assert!(path.is_valid_on(&grid));
    }

    #[test]
    fn test_bfs_no_path() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_cell(1, 0, CellState::Obstacle).unwrap();
        grid.set_cell(0, 1, CellState::Obstacle).unwrap();

        assert_eq!(
            bfs(&grid, Pos::new(0, 0), Pos::new(2, 2)),
            Err(LayoutError::NoPathFound {
                from: Pos::new(0, 0),
                to: Pos::new(2, 2),
            })
        );
    }
}
