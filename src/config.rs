use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::pathfinding::{ConnectionPolicy, SearchStrategy};
use crate::roads::{BlockPos, RoadPalette};
use crate::structures::{DoorSide, StructureCatalog};
use crate::world::TerrainConfig;

/// Top-level layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub meta: MetaConfig,
    pub area: AreaConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub roads: RoadConfig,
    #[serde(default)]
    pub terrain: TerrainConfig,
    /// Structures to request, in placement order
    #[serde(default)]
    pub structures: StructureCatalog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    /// Settlement name used in the chronicle
    #[serde(default = "default_name")]
    pub name: String,
    /// Random seed for reproducibility (drawn from entropy if absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_name() -> String {
    "Untitled Hamlet".to_string()
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    /// Build footprint size along x
    pub width: i32,
    /// Build footprint size along z
    pub depth: i32,
    /// World position of local cell (0, 0)
    #[serde(default)]
    pub origin: [i32; 3],
}

impl AreaConfig {
    pub fn origin(&self) -> BlockPos {
        let [x, y, z] = self.origin;
        BlockPos::new(x, y, z)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Rejected candidates in a row before an instance is skipped
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Minimum free cells between two footprints
    #[serde(default = "default_gap")]
    pub gap: i32,
    /// Footprint edge that carries the entrance
    #[serde(default)]
    pub door_side: DoorSide,
    /// Ring each structure with road
    #[serde(default = "default_true")]
    pub perimeter_roads: bool,
}

fn default_max_attempts() -> usize {
    100
}

fn default_gap() -> i32 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            gap: default_gap(),
            door_side: DoorSide::default(),
            perimeter_roads: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoadConfig {
    /// Path search algorithm
    #[serde(default)]
    pub search: SearchStrategy,
    /// Which goal pairs to connect
    #[serde(default)]
    pub policy: ConnectionPolicy,
    #[serde(flatten)]
    pub palette: RoadPalette,
}

impl LayoutConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_with(width: i32, depth: i32, seed: Option<u64>) -> Self {
        Self {
            meta: MetaConfig {
                seed,
                ..MetaConfig::default()
            },
            area: AreaConfig {
                width,
                depth,
                origin: [0, 0, 0],
            },
            placement: PlacementConfig::default(),
            roads: RoadConfig::default(),
            terrain: TerrainConfig::default(),
            structures: StructureCatalog::default(),
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.area.width <= 0 || self.area.depth <= 0 {
            return Err(LayoutError::InvalidDimension {
                width: self.area.width,
                height: self.area.depth,
            });
        }
        if self.placement.gap < 0 {
            return Err(LayoutError::Config(format!(
                "placement gap must not be negative, got {}",
                self.placement.gap
            )));
        }
        if self.terrain.feature_size <= 0 {
            return Err(LayoutError::Config(format!(
                "terrain feature_size must be positive, got {}",
                self.terrain.feature_size
            )));
        }
        self.structures.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{CountSpec, StructureKind};

    #[test]
    fn test_parse_toml() {
        let config: LayoutConfig = toml::from_str(
            r#"
            [meta]
            name = "Riverside"
            seed = 42

            [area]
            width = 64
            depth = 48
            origin = [100, 0, -200]

            [placement]
            gap = 3
            door_side = "east"

            [roads]
            search = "bfs"
            policy = "star"
            entrance_marker = "minecraft:gold_block"

            [[structures]]
            kind = "town_hall"
            count = 1

            [[structures]]
            kind = "house"
            width = 5
            depth = 6
            count = [2, 4]
            "#,
        )
        .unwrap();

        assert_eq!(config.meta.name, "Riverside");
        assert_eq!(config.meta.seed, Some(42));
        assert_eq!(config.area.origin(), BlockPos::new(100, 0, -200));
        assert_eq!(config.placement.gap, 3);
        assert_eq!(config.placement.max_attempts, 100);
        assert_eq!(config.placement.door_side, DoorSide::East);
        assert!(config.placement.perimeter_roads);
        assert_eq!(config.roads.search, SearchStrategy::Bfs);
        assert_eq!(config.roads.policy, ConnectionPolicy::Star);
        assert_eq!(config.roads.palette.surface, "minecraft:dirt_path");
        assert_eq!(
            config.roads.palette.entrance_marker.as_deref(),
            Some("minecraft:gold_block")
        );

        let entries = config.structures.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, StructureKind::TownHall);
        assert_eq!(entries[0].count, CountSpec::Fixed(1));
        assert_eq!(entries[1].count, CountSpec::Range([2, 4]));
        assert_eq!(entries[1].width, Some(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: LayoutConfig = toml::from_str("[area]\nwidth = 32\ndepth = 32\n").unwrap();
        assert_eq!(config.meta.seed, None);
        assert_eq!(config.placement.gap, 5);
        assert_eq!(config.roads.search, SearchStrategy::AStar);
        assert_eq!(config.roads.policy, ConnectionPolicy::Chain);
        assert_eq!(config.structures.entries().len(), 5);
    }

    #[test]
    fn test_bundled_settlement_config() {
        let config: LayoutConfig = toml::from_str(include_str!("../settlement.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.meta.seed, Some(2023));
        assert_eq!(config.structures.entries().len(), 5);
    }

    #[test]
    fn test_validation() {
        assert!(LayoutConfig::default_with(64, 64, Some(1)).validate().is_ok());
        assert!(matches!(
            LayoutConfig::default_with(0, 64, None).validate(),
            Err(LayoutError::InvalidDimension { .. })
        ));

        let mut config = LayoutConfig::default_with(64, 64, None);
        config.placement.gap = -1;
        assert!(matches!(config.validate(), Err(LayoutError::Config(_))));
    }
}
