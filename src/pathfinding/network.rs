//! Linking every goal cell into one road network.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LayoutError;
use crate::grid::{Grid, Pos};

use super::PathFinder;

/// Which goal pairs to route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionPolicy {
    /// Consecutive goals: `(g0, g1), (g1, g2), ...`
    #[default]
    Chain,
    /// The first goal to every other: `(g0, g1), (g0, g2), ...`
    Star,
}

impl ConnectionPolicy {
    /// Goal pairs in routing order
    pub fn pairs(&self, goals: &[Pos]) -> Vec<(Pos, Pos)> {
        match self {
            ConnectionPolicy::Chain => goals.windows(2).map(|w| (w[0], w[1])).collect(),
            ConnectionPolicy::Star => match goals.split_first() {
                Some((&hub, rest)) => rest.iter().map(|&g| (hub, g)).collect(),
                None => Vec::new(),
            },
        }
    }
}

/// A goal pair that was routed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: Pos,
    pub to: Pos,
    /// Moves along the path
    pub cost: usize,
    /// Cells newly turned into road
    pub roads_marked: usize,
}

/// A goal pair with no path between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedConnection {
    pub from: Pos,
    pub to: Pos,
}

/// Outcome of connecting the goals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub connected: Vec<Connection>,
    pub failed: Vec<FailedConnection>,
}

impl ConnectionReport {
    /// Whether every pair was routed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl PathFinder {
    /// Route every goal pair the policy names and mark the paths as road.
    ///
    /// Endpoints keep their GOAL state and only EMPTY cells become ROAD. A
    /// pair with no path is logged and skipped without touching the grid.
    pub fn connect_goals(&self, grid: &mut Grid, policy: ConnectionPolicy) -> ConnectionReport {
        let goals = grid.goal_cells();
        let mut report = ConnectionReport::default();

        for (from, to) in policy.pairs(&goals) {
            match self.find_path(grid, from, to) {
                Ok(path) => {
                    let roads_marked = path
                        .interior()
                        .iter()
                        .filter(|pos| grid.mark_road(**pos))
                        .count();
                    debug!(
                        "Connected {} -> {}: {} moves, {} new road cells",
                        from,
                        to,
                        path.cost(),
                        roads_marked
                    );
                    report.connected.push(Connection {
                        from,
                        to,
                        cost: path.cost(),
                        roads_marked,
                    });
                }
                Err(LayoutError::NoPathFound { .. }) => {
                    warn!("No path found between {} and {}, skipping", from, to);
                    report.failed.push(FailedConnection { from, to });
                }
                Err(e) => {
                    // Goals come from the grid itself, so they are always in bounds
                    warn!("Could not route {} -> {}: {}", from, to, e);
                    report.failed.push(FailedConnection { from, to });
                }
            }
        }

        info!(
            "Connected {} of {} goal pairs across {} goals",
            report.connected.len(),
            report.connected.len() + report.failed.len(),
            goals.len()
        );
        report
    }
}
