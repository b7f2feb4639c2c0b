//! World environment configuration - map border blocks and heights

use serde::{Deserialize, Serialize};
use tsumiki_blocks::Block;

use super::VoxelGrid;

/// Border configuration for a world session.
///
/// `edge_block` fills the space around the map between `sides_height` and
/// `edge_height`; when it is water, removing a boundary block inside that
/// band floods the cell (the edge-water rule).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldEnv {
    pub edge_block: u8,
    pub sides_height: usize,
    pub edge_height: usize,
}

impl WorldEnv {
    /// Classic defaults for a grid: water edge at half map height, sides two
    /// cells below it.
    pub fn for_grid(grid: &VoxelGrid) -> Self {
        let edge_height = grid.height() / 2;
        Self {
            edge_block: Block::STILL_WATER,
            sides_height: edge_height.saturating_sub(2),
            edge_height,
        }
    }

    /// Whether the border fill is water (either variant)
    pub fn edge_is_water(&self) -> bool {
        Block::is_water(self.edge_block)
    }
}

impl Default for WorldEnv {
    fn default() -> Self {
        Self {
            edge_block: Block::STILL_WATER,
            sides_height: 0,
            edge_height: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_grid_defaults() {
        let grid = VoxelGrid::new(16, 32, 16).unwrap();
        let env = WorldEnv::for_grid(&grid);
        assert_eq!(env.edge_height, 16);
        assert_eq!(env.sides_height, 14);
        assert!(env.edge_is_water());
    }

    #[test]
    fn test_lava_edge_is_not_water() {
        let env = WorldEnv {
            edge_block: Block::STILL_LAVA,
            ..WorldEnv::default()
        };
        assert!(!env.edge_is_water());
    }
}
