//! Error taxonomy for the layout engine.
//!
//! `InvalidDimension`, `OutOfBounds` and `MalformedRequest` are fatal to the
//! call that raised them. `PlacementExhausted` and `NoPathFound` are recovered
//! by the batch operations and only ever surface inside their reports.

use thiserror::Error;

use crate::grid::Pos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: i32, height: i32 },

    #[error("cell ({x}, {z}) is outside the grid")]
    OutOfBounds { x: i32, z: i32 },

    #[error("malformed request for {kind}: {reason}")]
    MalformedRequest { kind: String, reason: String },

    #[error("could not place {kind} after {attempts} attempts")]
    PlacementExhausted { kind: String, attempts: usize },

    #[error("no path from {from} to {to}")]
    NoPathFound { from: Pos, to: Pos },

    #[error("world rejected block at ({x}, {y}, {z}): {reason}")]
    WorldWrite { x: i32, y: i32, z: i32, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
