pub mod physics;
pub mod world;

// Re-export from tsumiki-blocks so downstream crates only need tsumiki-core
pub mod blocks {
    pub use tsumiki_blocks::*;
}

pub use physics::{BlockChange, BlockHandler, Physics, PhysicsConfig, SimContext, TickKind, TickQueue};
pub use world::{VoxelGrid, WorldEnv, WorldError};
