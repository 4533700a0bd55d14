//! Randomized non-overlapping structure placement.
//!
//! Each requested instance samples candidate origins uniformly until one
//! clears both the gap-expanded footprints accepted so far and any cell
//! already reserved on the grid. An instance that is rejected
//! `max_attempts` times in a row is skipped and reported; the batch carries on.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LayoutError, Result};
use crate::grid::{CellState, Grid, Pos};
use crate::structures::{DoorSide, Footprint, PlacedStructure, StructureKind, StructureRequest};

/// An instance that could not be placed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInstance {
    pub kind: StructureKind,
    /// Index of the instance within its request
    pub instance: usize,
    pub attempts: usize,
}

/// Outcome of a placement batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub placed: Vec<PlacedStructure>,
    pub skipped: Vec<SkippedInstance>,
}

impl PlacementReport {
    pub fn requested(&self) -> usize {
        self.placed.len() + self.skipped.len()
    }
}

/// Reserves footprints on a grid
#[derive(Debug, Clone)]
pub struct Placer {
    /// Consecutive rejected candidates before an instance is skipped
    pub max_attempts: usize,
    /// Minimum free cells between two footprints
    pub gap: i32,
    /// Entrance edge for requests without an explicit door offset
    pub door_side: DoorSide,
}

impl Placer {
    pub fn new(max_attempts: usize, gap: i32) -> Self {
        Self {
            max_attempts,
            gap,
            door_side: DoorSide::default(),
        }
    }

    pub fn with_door_side(mut self, side: DoorSide) -> Self {
        self.door_side = side;
        self
    }

    /// Place every requested instance, in request order.
    ///
    /// Malformed requests fail the whole call before the grid is touched.
    /// Exhausted instances are logged and listed in the report.
    pub fn place<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        requests: &[StructureRequest],
        rng: &mut R,
    ) -> Result<PlacementReport> {
        for request in requests {
            request.validate()?;
        }

        let mut report = PlacementReport::default();

        for request in requests {
            for instance in 0..request.count {
                match self.place_instance(grid, &report.placed, request, rng) {
                    Ok(footprint) => {
                        let entrance = self.entrance(request, &footprint);
                        reserve(grid, &footprint, entrance)?;

                        let placed = PlacedStructure {
                            id: report.placed.len(),
                            kind: request.kind,
                            footprint,
                            entrance,
                        };
                        debug!(
                            "Placed {} #{} at {} ({}x{}), door {}",
                            request.kind.display_name(),
                            placed.id,
                            Pos::new(footprint.x, footprint.z),
                            footprint.width,
                            footprint.depth,
                            entrance
                        );
                        report.placed.push(placed);
                    }
                    Err(LayoutError::PlacementExhausted { kind, attempts }) => {
                        warn!(
                            "Failed to place {} without overlapping after {} attempts, skipping",
                            kind, attempts
                        );
                        report.skipped.push(SkippedInstance {
                            kind: request.kind,
                            instance,
                            attempts,
                        });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            "Placed {} of {} requested structures",
            report.placed.len(),
            report.requested()
        );
        Ok(report)
    }

    /// Sample candidates for one instance until one fits
    fn place_instance<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        accepted: &[PlacedStructure],
        request: &StructureRequest,
        rng: &mut R,
    ) -> Result<Footprint> {
        let max_x = grid.width() - request.width;
        let max_z = grid.height() - request.depth;

        // Footprint larger than the grid: no candidate exists
        if max_x < 0 || max_z < 0 {
            return Err(self.exhausted(request, 0));
        }

        for _ in 0..self.max_attempts {
            let candidate = Footprint::new(
                rng.gen_range(0..=max_x),
                rng.gen_range(0..=max_z),
                request.width,
                request.depth,
            );

            if !self.overlaps(grid, accepted, &candidate) {
                return Ok(candidate);
            }
        }

        Err(self.exhausted(request, self.max_attempts))
    }

    /// Whether a candidate collides with accepted footprints (grown by the
    /// gap) or with reserved cells already on the grid
    pub fn overlaps(&self, grid: &Grid, accepted: &[PlacedStructure], candidate: &Footprint) -> bool {
        // Any gap past the larger grid side already covers the whole grid
        let gap = self.gap.min(grid.width().max(grid.height()));
        if accepted
            .iter()
            .any(|p| p.footprint.expanded(gap).intersects(candidate))
        {
            return true;
        }

        candidate.cells().any(|pos| {
            matches!(
                grid.get(pos),
                Some(CellState::Obstacle | CellState::Goal) | None
            )
        })
    }

    fn entrance(&self, request: &StructureRequest, footprint: &Footprint) -> Pos {
        match request.door {
            Some((dx, dz)) => Pos::new(footprint.x + dx, footprint.z + dz),
            None => self.door_side.door_cell(footprint),
        }
    }

    fn exhausted(&self, request: &StructureRequest, attempts: usize) -> LayoutError {
        LayoutError::PlacementExhausted {
            kind: request.kind.display_name().to_string(),
            attempts,
        }
    }
}

/// Mark a footprint OBSTACLE and its entrance GOAL
fn reserve(grid: &mut Grid, footprint: &Footprint, entrance: Pos) -> Result<()> {
    for pos in footprint.cells() {
        grid.set_cell(pos.x, pos.z, CellState::Obstacle)?;
    }
    grid.set_cell(entrance.x, entrance.z, CellState::Goal)
}

/// Ring every placed footprint with road, one cell outside its edge.
///
/// Only EMPTY in-bounds cells change. Returns the number of cells marked.
pub fn lay_perimeter_roads(grid: &mut Grid, placed: &[PlacedStructure]) -> usize {
    let marked = placed
        .iter()
        .flat_map(|p| p.footprint.ring())
        .filter(|pos| grid.mark_road(*pos))
        .count();
    debug!("Laid {} perimeter road cells around {} structures", marked, placed.len());
    marked
}
