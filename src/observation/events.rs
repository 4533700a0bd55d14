use serde::{Deserialize, Serialize};

use crate::grid::Pos;
use crate::pathfinding::ConnectionReport;
use crate::placement::PlacementReport;
use crate::roads::MaterializeReport;
use crate::structures::{Footprint, StructureKind};

/// A layout event for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutEvent {
    // Placement
    StructurePlaced {
        id: usize,
        kind: StructureKind,
        footprint: Footprint,
        entrance: Pos,
    },
    PlacementSkipped {
        kind: StructureKind,
        instance: usize,
        attempts: usize,
    },

    // Roads
    PerimeterRoads {
        cells: usize,
    },
    RoadConnected {
        from: Pos,
        to: Pos,
        cost: usize,
        roads_marked: usize,
    },
    RoadFailed {
        from: Pos,
        to: Pos,
    },
    RoadsMaterialized {
        roads: usize,
        substituted: usize,
        entrances: usize,
    },
}

impl LayoutEvent {
    /// Events for every placed and skipped instance
    pub fn from_placement(report: &PlacementReport) -> Vec<LayoutEvent> {
        let placed = report.placed.iter().map(|p| LayoutEvent::StructurePlaced {
            id: p.id,
            kind: p.kind,
            footprint: p.footprint,
            entrance: p.entrance,
        });
        let skipped = report.skipped.iter().map(|s| LayoutEvent::PlacementSkipped {
            kind: s.kind,
            instance: s.instance,
            attempts: s.attempts,
        });
        placed.chain(skipped).collect()
    }

    /// Events for every routed and failed goal pair
    pub fn from_connections(report: &ConnectionReport) -> Vec<LayoutEvent> {
        let connected = report.connected.iter().map(|c| LayoutEvent::RoadConnected {
            from: c.from,
            to: c.to,
            cost: c.cost,
            roads_marked: c.roads_marked,
        });
        let failed = report
            .failed
            .iter()
            .map(|f| LayoutEvent::RoadFailed { from: f.from, to: f.to });
        connected.chain(failed).collect()
    }

    pub fn from_materialize(report: &MaterializeReport) -> LayoutEvent {
        LayoutEvent::RoadsMaterialized {
            roads: report.roads,
            substituted: report.substituted,
            entrances: report.entrances,
        }
    }
}
