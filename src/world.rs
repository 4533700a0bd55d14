//! In-memory world backend.
//!
//! [`WorldSlice`] is a read-only terrain snapshot over the build area (heights
//! and liquid columns); [`BlockBuffer`] collects the blocks written by the
//! pipeline. Writes are not reflected back into the slice.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::roads::{BlockClassifier, BlockPos, BlockWriter, HeightOracle};

/// Terrain generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Mean ground height
    #[serde(default = "default_base_height")]
    pub base_height: i32,
    /// Maximum deviation from the mean
    #[serde(default = "default_amplitude")]
    pub amplitude: i32,
    /// Columns whose ground lies below this are flooded up to it
    #[serde(default = "default_water_level")]
    pub water_level: i32,
    /// Distance in cells between noise lattice points
    #[serde(default = "default_feature_size")]
    pub feature_size: i32,
}

fn default_base_height() -> i32 {
    64
}

fn default_amplitude() -> i32 {
    4
}

fn default_water_level() -> i32 {
    62
}

fn default_feature_size() -> i32 {
    16
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            base_height: default_base_height(),
            amplitude: default_amplitude(),
            water_level: default_water_level(),
            feature_size: default_feature_size(),
        }
    }
}

/// One terrain column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// First free Y above solid ground
    pub ground: i32,
    /// First free Y above the column, liquid included
    pub surface: i32,
}

impl Column {
    pub fn is_flooded(&self) -> bool {
        self.surface > self.ground
    }
}

/// A terrain snapshot of the build area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSlice {
    pub origin: BlockPos,
    pub width: i32,
    pub depth: i32,
    columns: Vec<Column>,
}

impl WorldSlice {
    /// Level ground at `height` everywhere
    pub fn flat(origin: BlockPos, width: i32, depth: i32, height: i32) -> Self {
        let column = Column {
            ground: height,
            surface: height,
        };
        Self {
            origin,
            width,
            depth,
            columns: vec![column; (width.max(0) * depth.max(0)) as usize],
        }
    }

    /// Rolling terrain from bilinear value noise
    pub fn generate<R: Rng + ?Sized>(
        origin: BlockPos,
        width: i32,
        depth: i32,
        config: &TerrainConfig,
        rng: &mut R,
    ) -> Self {
        let step = config.feature_size.max(1);
        let lattice_w = (width / step + 2) as usize;
        let lattice_d = (depth / step + 2) as usize;
        let lattice: Vec<f64> = (0..lattice_w * lattice_d)
            .map(|_| rng.gen_range(-1.0..=1.0))
            .collect();

        let sample = |x: i32, z: i32| -> f64 {
            let (gx, gz) = ((x / step) as usize, (z / step) as usize);
            let tx = smoothstep((x % step) as f64 / step as f64);
            let tz = smoothstep((z % step) as f64 / step as f64);
            let at = |i: usize, j: usize| lattice[i * lattice_d + j];
            let top = lerp(at(gx, gz), at(gx + 1, gz), tx);
            let bottom = lerp(at(gx, gz + 1), at(gx + 1, gz + 1), tx);
            lerp(top, bottom, tz)
        };

        let mut columns = Vec::with_capacity((width.max(0) * depth.max(0)) as usize);
        for x in 0..width {
            for z in 0..depth {
                let ground =
                    config.base_height + (sample(x, z) * config.amplitude as f64).round() as i32;
                columns.push(Column {
                    ground,
                    surface: ground.max(config.water_level),
                });
            }
        }

        Self {
            origin,
            width,
            depth,
            columns,
        }
    }

    /// Column at local coordinates, clamped to the slice edge
    pub fn column(&self, x: i32, z: i32) -> Column {
        let x = x.clamp(0, self.width - 1);
        let z = z.clamp(0, self.depth - 1);
        self.columns[(x * self.depth + z) as usize]
    }

    /// Flood a column up to `level`, used to build test scenarios
    pub fn flood(&mut self, x: i32, z: i32, level: i32) {
        if x < 0 || z < 0 || x >= self.width || z >= self.depth {
            return;
        }
        let column = &mut self.columns[(x * self.depth + z) as usize];
        column.surface = column.surface.max(level);
    }

    /// Number of flooded columns
    pub fn flooded_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_flooded()).count()
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

impl HeightOracle for WorldSlice {
    fn height(&self, x: i32, z: i32) -> i32 {
        self.column(x, z).surface
    }
}

impl BlockClassifier for WorldSlice {
    fn is_liquid(&self, pos: BlockPos) -> bool {
        let (x, z) = (pos.x - self.origin.x, pos.z - self.origin.z);
        if x < 0 || z < 0 || x >= self.width || z >= self.depth {
            return false;
        }
        let column = self.column(x, z);
        pos.y >= column.ground && pos.y < column.surface
    }
}

/// Blocks written by the pipeline, keyed by position
#[derive(Debug, Clone)]
pub struct BlockBuffer {
    blocks: BTreeMap<BlockPos, String>,
    /// Lowest buildable Y
    pub min_y: i32,
    /// One past the highest buildable Y
    pub max_y: i32,
}

impl BlockBuffer {
    pub fn new() -> Self {
        Self::with_build_limits(-64, 320)
    }

    pub fn with_build_limits(min_y: i32, max_y: i32) -> Self {
        Self {
            blocks: BTreeMap::new(),
            min_y,
            max_y,
        }
    }

    pub fn get(&self, pos: BlockPos) -> Option<&str> {
        self.blocks.get(&pos).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockPos, &String)> {
        self.blocks.iter()
    }

    /// Number of blocks of a given material
    pub fn count_of(&self, material: &str) -> usize {
        self.blocks.values().filter(|m| m.as_str() == material).count()
    }
}

impl Default for BlockBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockWriter for BlockBuffer {
    fn place(&mut self, pos: BlockPos, material: &str) -> Result<()> {
        if pos.y < self.min_y || pos.y >= self.max_y {
            return Err(LayoutError::WorldWrite {
                x: pos.x,
                y: pos.y,
                z: pos.z,
                reason: format!("outside build limits [{}, {})", self.min_y, self.max_y),
            });
        }
        self.blocks.insert(pos, material.to_string());
        Ok(())
    }
}
