//! Block physics - dispatch tables, delay queues, and the behavior subsystems

mod config;
mod dispatch;
mod engine;
mod falling;
mod foliage;
mod liquid;
mod other;
mod queue;
mod tnt;

pub use config::PhysicsConfig;
pub use dispatch::{BlockHandler, Dispatch, TickKind};
pub use engine::{BlockChange, Physics, SimContext};
pub use falling::FallingState;
pub use liquid::LiquidState;
pub use queue::{TickQueue, MAX_DELAY};
pub use tnt::TntState;
