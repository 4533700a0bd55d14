//! Settlement layout engine.
//!
//! Places non-overlapping structures on a grid over the build area, connects
//! their entrances with shortest-path roads and writes those roads into the
//! world:
//!
//! 1. [`placement::Placer`] reserves footprints and marks each door as a goal
//! 2. [`pathfinding::PathFinder`] routes goal to goal and marks road cells
//! 3. [`roads::RoadMaterializer`] turns road cells into world blocks
//!
//! [`engine::Engine`] runs the three in order.

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod observation;
pub mod pathfinding;
pub mod placement;
pub mod roads;
pub mod structures;
pub mod world;

pub use error::{LayoutError, Result};
pub use grid::{CellState, Grid, Pos};
