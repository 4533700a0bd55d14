//! Grid A* with a Manhattan heuristic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{LayoutError, Result};
use crate::grid::{Grid, Pos};

use super::{check_endpoints, reconstruct, Path};

/// Node for the A* priority queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    pos: Pos,
    /// Cost from the start
    g: u32,
    /// Estimated cost to the goal
    h: u32,
}

impl PathNode {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; equal f goes to the smaller coordinate
        other
            .f()
            .cmp(&self.f())
            .then_with(|| other.pos.cmp(&self.pos))
            .then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `start` to `goal`, avoiding OBSTACLE cells
pub fn astar(grid: &Grid, start: Pos, goal: Pos) -> Result<Path> {
    check_endpoints(grid, start, goal)?;

    let mut open = BinaryHeap::new();
    let mut cost_so_far: HashMap<Pos, u32> = HashMap::new();
    let mut came_from: HashMap<Pos, Pos> = HashMap::new();

    cost_so_far.insert(start, 0);
    open.push(PathNode {
        pos: start,
        g: 0,
        h: start.manhattan(goal),
    });

    while let Some(node) = open.pop() {
        if node.pos == goal {
            return reconstruct(&came_from, start, goal)
                .ok_or(LayoutError::NoPathFound { from: start, to: goal });
        }

        // Stale entry, a cheaper route to this cell was queued later
        if cost_so_far.get(&node.pos).is_some_and(|&g| node.g > g) {
            continue;
        }

        for next in node.pos.neighbors() {
            if !grid.is_passable(next) {
                continue;
            }

            let new_cost = node.g + 1;
            if cost_so_far.get(&next).is_some_and(|&g| g <= new_cost) {
                continue;
            }

            cost_so_far.insert(next, new_cost);
            came_from.insert(next, node.pos);
            open.push(PathNode {
                pos: next,
                g: new_cost,
                h: next.manhattan(goal),
            });
        }
    }

    Err(LayoutError::NoPathFound { from: start, to: goal })
}
