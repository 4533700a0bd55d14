use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::grid::Grid;
use crate::observation::LayoutEvent;
use crate::pathfinding::{ConnectionReport, PathFinder};
use crate::placement::{lay_perimeter_roads, PlacementReport, Placer};
use crate::roads::{BlockPos, MaterializeReport, RoadMaterializer};
use crate::world::{BlockBuffer, WorldSlice};

/// Everything one run decided
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub seed: u64,
    pub origin: BlockPos,
    pub grid: Grid,
    pub placement: PlacementReport,
    /// Cells laid by perimeter roads
    pub perimeter_cells: usize,
    pub connections: ConnectionReport,
    pub materialized: MaterializeReport,
}

/// The layout pipeline: placement, then roads, then world writes
pub struct Engine {
    config: LayoutConfig,
    seed: u64,
    rng: ChaCha8Rng,
    world: WorldSlice,
    blocks: BlockBuffer,
    events: Vec<LayoutEvent>,
}

impl Engine {
    /// Create an engine over freshly generated terrain
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let seed = resolve_seed(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let world = WorldSlice::generate(
            config.area.origin(),
            config.area.width,
            config.area.depth,
            &config.terrain,
            &mut rng,
        );
        debug!("Generated terrain with {} flooded columns", world.flooded_columns());

        Ok(Self {
            config,
            seed,
            rng,
            world,
            blocks: BlockBuffer::new(),
            events: Vec::new(),
        })
    }

    /// Create an engine over existing terrain
    pub fn with_world(config: LayoutConfig, world: WorldSlice) -> Result<Self> {
        config.validate()?;
        let area = &config.area;
        if world.origin != area.origin() || world.width != area.width || world.depth != area.depth {
            return Err(LayoutError::Config(format!(
                "world slice {}x{} at {:?} does not cover the {}x{} area at {:?}",
                world.width,
                world.depth,
                world.origin,
                area.width,
                area.depth,
                area.origin()
            )));
        }
        let seed = resolve_seed(&config);

        Ok(Self {
            config,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            world,
            blocks: BlockBuffer::new(),
            events: Vec::new(),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn world(&self) -> &WorldSlice {
        &self.world
    }

    /// Blocks written by the last run
    pub fn blocks(&self) -> &BlockBuffer {
        &self.blocks
    }

    /// Events recorded by the last run
    pub fn events(&self) -> &[LayoutEvent] {
        &self.events
    }

    /// Lay out the settlement on a fresh grid.
    ///
    /// Skipped structures and unreachable goal pairs do not fail the run;
    /// they are logged and listed in the returned layout.
    pub fn run(&mut self) -> Result<Layout> {
        let area = &self.config.area;
        let origin = area.origin();
        info!(
            "Laying out '{}' on a {}x{} area at seed {}",
            self.config.meta.name, area.width, area.depth, self.seed
        );

        self.blocks = BlockBuffer::new();
        self.events.clear();

        let mut grid = Grid::new(area.width, area.depth)?;

        // Structures
        let requests = self.config.structures.requests(&mut self.rng)?;
        let placer = Placer::new(self.config.placement.max_attempts, self.config.placement.gap)
            .with_door_side(self.config.placement.door_side);
        let placement = placer.place(&mut grid, &requests, &mut self.rng)?;
        self.events.extend(LayoutEvent::from_placement(&placement));

        let perimeter_cells = if self.config.placement.perimeter_roads {
            let cells = lay_perimeter_roads(&mut grid, &placement.placed);
            self.events.push(LayoutEvent::PerimeterRoads { cells });
            cells
        } else {
            0
        };

        // Roads
        let finder = PathFinder::new(self.config.roads.search);
        let connections = finder.connect_goals(&mut grid, self.config.roads.policy);
        self.events.extend(LayoutEvent::from_connections(&connections));

        let materializer = RoadMaterializer::new(self.config.roads.palette.clone());
        let materialized =
            materializer.materialize(&grid, origin, &self.world, &self.world, &mut self.blocks)?;
        self.events.push(LayoutEvent::from_materialize(&materialized));

        if !placement.skipped.is_empty() || !connections.is_complete() {
            warn!(
                "Layout is partial: {} structures skipped, {} goal pairs unreachable",
                placement.skipped.len(),
                connections.failed.len()
            );
        }

        Ok(Layout {
            seed: self.seed,
            origin,
            grid,
            placement,
            perimeter_cells,
            connections,
            materialized,
        })
    }
}

fn resolve_seed(config: &LayoutConfig) -> u64 {
    match config.meta.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!("No seed configured, using {}", seed);
            seed
        }
    }
}
