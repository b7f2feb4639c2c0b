//! Physics tunables

use serde::{Deserialize, Serialize};

/// Externalized simulation parameters. All delays are in simulation ticks and
/// must fit the packed event encoding (at most 31).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Whether the simulation starts enabled
    pub enabled: bool,
    /// Ticks between water spread steps
    pub water_delay: u32,
    /// Ticks between lava spread steps
    pub lava_delay: u32,
    /// Fuse length scheduled when TNT is placed
    pub tnt_fuse: u32,
    /// Blast sphere radius in cells
    pub blast_radius: i32,
    /// Delay before a gravity block starts to drop
    pub fall_delay: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            water_delay: 5,
            lava_delay: 30,
            tnt_fuse: 4,
            blast_radius: 4,
            fall_delay: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::queue::MAX_DELAY;

    #[test]
    fn test_default_delays_fit_packed_encoding() {
        let config = PhysicsConfig::default();
        assert!(config.water_delay <= MAX_DELAY);
        assert!(config.lava_delay <= MAX_DELAY);
        assert!(config.tnt_fuse <= MAX_DELAY);
        assert!(config.fall_delay <= MAX_DELAY);
    }
}
