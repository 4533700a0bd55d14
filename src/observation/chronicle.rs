use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::events::LayoutEvent;
use crate::engine::Layout;
use crate::grid::CellState;

/// Writes the layout log and a human-readable chronicle
pub struct Chronicle {
    output_dir: PathBuf,
    events_file: BufWriter<File>,
    chronicle_file: BufWriter<File>,
}

impl Chronicle {
    pub fn new(output_dir: &str) -> anyhow::Result<Self> {
        let output_path = PathBuf::from(output_dir);
        fs::create_dir_all(&output_path)?;

        let events_path = output_path.join("events.jsonl");
        let chronicle_path = output_path.join("layout.md");

        let events_file = BufWriter::new(File::create(events_path)?);
        let chronicle_file = BufWriter::new(File::create(chronicle_path)?);

        Ok(Self {
            output_dir: output_path,
            events_file,
            chronicle_file,
        })
    }

    /// Write the chronicle header
    pub fn write_header(&mut self, name: &str, layout: &Layout) -> anyhow::Result<()> {
        writeln!(self.chronicle_file, "# {}", name)?;
        writeln!(self.chronicle_file)?;
        writeln!(
            self.chronicle_file,
            "> Laid out {} with seed {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            layout.seed
        )?;
        writeln!(self.chronicle_file)?;
        writeln!(self.chronicle_file, "## The Land")?;
        writeln!(self.chronicle_file)?;
        writeln!(
            self.chronicle_file,
            "A {}x{} build area with its corner at ({}, {}, {}).",
            layout.grid.width(),
            layout.grid.height(),
            layout.origin.x,
            layout.origin.y,
            layout.origin.z
        )?;
        writeln!(self.chronicle_file)?;
        writeln!(self.chronicle_file, "## Construction")?;
        writeln!(self.chronicle_file)?;

        self.chronicle_file.flush()?;
        Ok(())
    }

    /// Log an event (to both events.jsonl and the chronicle)
    pub fn log_event(&mut self, event: &LayoutEvent) -> anyhow::Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.events_file, "{}", json)?;

        writeln!(self.chronicle_file, "- {}", narrate(event))?;
        Ok(())
    }

    /// Flush both files
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.events_file.flush()?;
        self.chronicle_file.flush()?;
        Ok(())
    }

    /// Write the map and the closing summary
    pub fn write_footer(&mut self, layout: &Layout) -> anyhow::Result<()> {
        writeln!(self.chronicle_file)?;
        writeln!(self.chronicle_file, "## The Map")?;
        writeln!(self.chronicle_file)?;
        writeln!(
            self.chronicle_file,
            "`#` structure, `@` entrance, `=` road, `.` open ground"
        )?;
        writeln!(self.chronicle_file)?;
        writeln!(self.chronicle_file, "```")?;
        write!(self.chronicle_file, "{}", layout.grid.render())?;
        writeln!(self.chronicle_file, "```")?;
        writeln!(self.chronicle_file)?;

        writeln!(self.chronicle_file, "## Summary")?;
        writeln!(self.chronicle_file)?;
        writeln!(
            self.chronicle_file,
            "- Structures: {} placed, {} skipped",
            layout.placement.placed.len(),
            layout.placement.skipped.len()
        )?;
        writeln!(
            self.chronicle_file,
            "- Connections: {} routed, {} unreachable",
            layout.connections.connected.len(),
            layout.connections.failed.len()
        )?;
        writeln!(
            self.chronicle_file,
            "- Road cells: {} ({} built over water)",
            layout.grid.count(CellState::Road),
            layout.materialized.substituted
        )?;

        writeln!(self.chronicle_file)?;
        writeln!(self.chronicle_file, "---")?;
        writeln!(self.chronicle_file)?;
        writeln!(
            self.chronicle_file,
            "*Chronicle generated by Hamlet v{}*",
            env!("CARGO_PKG_VERSION")
        )?;

        self.flush()?;
        Ok(())
    }

    /// Save the final layout as JSON
    pub fn save_snapshot(&self, layout: &Layout) -> anyhow::Result<()> {
        let path = self.output_dir.join("layout.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, layout)?;
        Ok(())
    }
}

/// One chronicle line for an event
pub fn narrate(event: &LayoutEvent) -> String {
    match event {
        LayoutEvent::StructurePlaced {
            id,
            kind,
            footprint,
            entrance,
        } => format!(
            "A **{}** (#{}) rises at ({}, {}), {}x{}, its door at {}.",
            kind.display_name(),
            id,
            footprint.x,
            footprint.z,
            footprint.width,
            footprint.depth,
            entrance
        ),
        LayoutEvent::PlacementSkipped {
            kind, attempts, ..
        } => format!(
            "No room was found for another **{}** after {} attempts.",
            kind.display_name(),
            attempts
        ),
        LayoutEvent::PerimeterRoads { cells } => {
            format!("Footpaths ring the buildings ({} cells).", cells)
        }
        LayoutEvent::RoadConnected { from, to, cost, .. } => {
            format!("A road joins {} and {} ({} steps).", from, to, cost)
        }
        LayoutEvent::RoadFailed { from, to } => {
            format!("**No road could reach from {} to {}.**", from, to)
        }
        LayoutEvent::RoadsMaterialized {
            roads,
            substituted,
            entrances,
        } => format!(
            "{} road blocks were laid, {} of them over water, and {} doors marked.",
            roads, substituted, entrances
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pos;
    use crate::structures::{Footprint, StructureKind};

    #[test]
    fn test_narrate_placement() {
        let event = LayoutEvent::StructurePlaced {
            id: 2,
            kind: StructureKind::ArcherTower,
            footprint: Footprint::new(4, 9, 5, 5),
            entrance: Pos::new(6, 13),
        };
        assert_eq!(
            narrate(&event),
            "A **archer tower** (#2) rises at (4, 9), 5x5, its door at (6, 13)."
        );
    }

    #[test]
    fn test_narrate_failure() {
        let event = LayoutEvent::RoadFailed {
            from: Pos::new(0, 0),
            to: Pos::new(5, 5),
        };
        assert_eq!(narrate(&event), "**No road could reach from (0, 0) to (5, 5).**");
    }
}
