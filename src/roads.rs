//! Turning road cells into world blocks.
//!
//! The materializer is the only part of the pipeline with world side
//! effects. It reads the grid, asks the height oracle where each column's
//! surface is, and writes one block per ROAD cell, swapping to a solid
//! material where the surface is liquid.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::grid::{CellState, Grid, Pos};

/// An absolute world position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset by `(dx, dy, dz)`
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Surface height per local column
pub trait HeightOracle {
    /// Y of the first free block above the terrain at local `(x, z)`
    fn height(&self, x: i32, z: i32) -> i32;
}

/// Block classification at world positions
pub trait BlockClassifier {
    fn is_liquid(&self, pos: BlockPos) -> bool;
}

/// The single world-mutation primitive
pub trait BlockWriter {
    fn place(&mut self, pos: BlockPos, material: &str) -> Result<()>;
}

/// Materials used for roads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadPalette {
    /// Road block on solid ground
    #[serde(default = "default_surface")]
    pub surface: String,
    /// Road block where the terrain is liquid
    #[serde(default = "default_over_liquid")]
    pub over_liquid: String,
    /// Block written at each entrance, none when absent
    #[serde(default)]
    pub entrance_marker: Option<String>,
}

fn default_surface() -> String {
    "minecraft:dirt_path".to_string()
}

fn default_over_liquid() -> String {
    "minecraft:oak_planks".to_string()
}

impl Default for RoadPalette {
    fn default() -> Self {
        Self {
            surface: default_surface(),
            over_liquid: default_over_liquid(),
            entrance_marker: None,
        }
    }
}

impl RoadPalette {
    /// Road material for a position, given whether it is liquid
    pub fn material_for(&self, liquid: bool) -> &str {
        if liquid {
            &self.over_liquid
        } else {
            &self.surface
        }
    }
}

/// Counts from one materialization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeReport {
    /// Road blocks written
    pub roads: usize,
    /// Of those, how many used the over-liquid material
    pub substituted: usize,
    /// Entrance markers written
    pub entrances: usize,
}

/// Writes road cells into the world
#[derive(Debug, Clone, Default)]
pub struct RoadMaterializer {
    pub palette: RoadPalette,
}

impl RoadMaterializer {
    pub fn new(palette: RoadPalette) -> Self {
        Self { palette }
    }

    /// World position of the surface block under local cell `pos`
    pub fn world_position(origin: BlockPos, pos: Pos, heights: &impl HeightOracle) -> BlockPos {
        origin.offset(pos.x, heights.height(pos.x, pos.z) - 1, pos.z)
    }

    /// Write one block per ROAD cell, in grid scan order. The grid is not
    /// modified. Writer errors stop the run and are returned.
    pub fn materialize(
        &self,
        grid: &Grid,
        origin: BlockPos,
        heights: &impl HeightOracle,
        classifier: &impl BlockClassifier,
        writer: &mut impl BlockWriter,
    ) -> Result<MaterializeReport> {
        let mut report = MaterializeReport::default();

        for pos in grid.cells_with(CellState::Road) {
            let block = Self::world_position(origin, pos, heights);
            let liquid = classifier.is_liquid(block);
            writer.place(block, self.palette.material_for(liquid))?;

            report.roads += 1;
            if liquid {
                report.substituted += 1;
            }
        }

        if let Some(marker) = &self.palette.entrance_marker {
            for pos in grid.goal_cells() {
                let block = Self::world_position(origin, pos, heights);
                writer.place(block, marker)?;
                report.entrances += 1;
            }
        }

        debug!(
            "Road materials: {} over solid ground, {} over liquid",
            report.roads - report.substituted,
            report.substituted
        );
        info!(
            "Materialized {} road blocks and {} entrance markers",
            report.roads, report.entrances
        );
        Ok(report)
    }
}
