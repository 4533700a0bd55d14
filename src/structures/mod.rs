//! Structures placed in a settlement.
//!
//! - **StructureKind**: what is being built (town hall, house, ...)
//! - **StructureRequest**: a kind, a footprint size and how many to place
//! - **PlacedStructure**: a reserved footprint plus its entrance cell
//! - **StructureCatalog**: the ordered list of requests for one settlement

mod catalog;
mod types;

pub use catalog::{CatalogEntry, CountSpec, StructureCatalog};
pub use types::{DoorSide, Footprint, PlacedStructure, StructureKind, StructureRequest};
