//! Block-type definitions shared by the Tsumiki simulation crates.

mod block;

pub use block::{Block, BlockDef, Blocks, Collide};
