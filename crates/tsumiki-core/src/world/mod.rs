//! World data - voxel grid and environment configuration

mod env;
mod grid;

pub use env::WorldEnv;
pub use grid::{VoxelGrid, WorldError, MAX_CELLS};
