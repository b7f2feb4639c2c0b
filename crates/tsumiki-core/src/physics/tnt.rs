//! Timed explosives - fused TNT with a spherical blast

use glam::IVec3;
use tsumiki_blocks::Block;

use super::dispatch::{Dispatch, TickKind};
use super::engine::SimContext;
use super::queue::TickQueue;
use super::PhysicsConfig;

/// Fuse length used when lava or another explosion ignites TNT
const CHAIN_FUSE: u32 = 1;

pub struct TntState {
    fuses: TickQueue,
    fuse_ticks: u32,
    blast_radius: i32,
}

impl TntState {
    pub(crate) fn new(config: &PhysicsConfig) -> Self {
        Self {
            fuses: TickQueue::new(),
            fuse_ticks: config.tnt_fuse,
            blast_radius: config.blast_radius,
        }
    }

    pub fn reset_map(&mut self) {
        self.fuses.clear();
    }
}

pub(crate) fn register(dispatch: &mut Dispatch) {
    dispatch.register(Block::TNT, TickKind::Place, place_tnt);
    dispatch.register(Block::TNT, TickKind::Activate, activate_tnt);
}

fn place_tnt(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let fuse = ctx.tnt.fuse_ticks;
    ctx.tnt.fuses.schedule(index, fuse);
}

/// Adjacent lava lights the fuse immediately
fn activate_tnt(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let p = ctx.grid.coords(index);
    let touched_by_lava = [
        IVec3::new(-1, 0, 0),
        IVec3::new(1, 0, 0),
        IVec3::new(0, 0, -1),
        IVec3::new(0, 0, 1),
        IVec3::new(0, -1, 0),
        IVec3::new(0, 1, 0),
    ]
    .into_iter()
    .map(|d| p + d)
    .filter(|&n| ctx.grid.contains(n))
    .any(|n| Block::is_lava(ctx.grid.get(n.x as usize, n.y as usize, n.z as usize)));

    if touched_by_lava {
        ctx.tnt.fuses.schedule(index, CHAIN_FUSE);
    }
}

pub(crate) fn tick(ctx: &mut SimContext<'_>) {
    let count = ctx.tnt.fuses.len();
    for _ in 0..count {
        let Some(index) = ctx.tnt.fuses.step() else {
            continue;
        };
        // A duplicate or stale fuse finds the cell already cleared
        if ctx.block(index) != Block::TNT {
            continue;
        }
        explode(ctx, index);
    }
}

/// Clear a solid sphere around the cell. Bedrock and liquids are immune;
/// other TNT inside the blast chain-ignites with a short fuse.
fn explode(ctx: &mut SimContext<'_>, index: usize) {
    let center = ctx.grid.coords(index);
    ctx.set_block(index, Block::AIR);
    log::debug!("tnt explosion at {center}");

    let r = ctx.tnt.blast_radius;
    for dy in -r..=r {
        for dz in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy + dz * dz > r * r {
                    continue;
                }
                let p = center + IVec3::new(dx, dy, dz);
                if !ctx.grid.contains(p) {
                    continue;
                }
                let i = ctx.grid.idx(p.x as usize, p.y as usize, p.z as usize);
                let block = ctx.block(i);
                if block == Block::AIR || block == Block::BEDROCK || Block::is_liquid(block) {
                    continue;
                }
                if block == Block::TNT {
                    ctx.tnt.fuses.schedule(i, CHAIN_FUSE);
                } else {
                    ctx.set_block(i, Block::AIR);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{VoxelGrid, WorldEnv};
    use crate::Physics;

    fn setup() -> (Physics, VoxelGrid, WorldEnv) {
        let grid = VoxelGrid::new(16, 16, 16).unwrap();
        (
            Physics::with_seed(PhysicsConfig::default(), 7),
            grid,
            WorldEnv::default(),
        )
    }

    fn place(physics: &mut Physics, grid: &mut VoxelGrid, env: &WorldEnv, x: usize, y: usize, z: usize, block: u8) {
        let index = grid.idx(x, y, z);
        let old = grid.get_index(index);
        grid.set_index(index, block);
        physics.notify_block_changed(grid, env, index, old, block);
    }

    #[test]
    fn test_tnt_explodes_on_fifth_tick() {
        let (mut physics, mut grid, env) = setup();
        place(&mut physics, &mut grid, &env, 8, 8, 8, Block::TNT);

        for _ in 0..4 {
            physics.tick(&mut grid, &env);
            assert_eq!(grid.get(8, 8, 8), Block::TNT);
        }
        physics.tick(&mut grid, &env);
        assert_eq!(grid.get(8, 8, 8), Block::AIR);
    }

    #[test]
    fn test_blast_is_spherical_and_spares_bedrock() {
        let (mut physics, mut grid, env) = setup();
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    grid.set(x, y, z, Block::STONE);
                }
            }
        }
        grid.set(8, 4, 8, Block::BEDROCK);
        place(&mut physics, &mut grid, &env, 8, 8, 8, Block::TNT);

        for _ in 0..5 {
            physics.tick(&mut grid, &env);
        }

        // Inside the radius-4 sphere
        assert_eq!(grid.get(8, 8, 8), Block::AIR);
        assert_eq!(grid.get(12, 8, 8), Block::AIR);
        assert_eq!(grid.get(8, 11, 8), Block::AIR);
        // Bedrock survives even inside the blast
        assert_eq!(grid.get(8, 4, 8), Block::BEDROCK);
        // Corner of the bounding cube is outside the sphere
        assert_eq!(grid.get(11, 11, 11), Block::STONE);
        assert_eq!(grid.get(13, 8, 8), Block::STONE);
    }

    #[test]
    fn test_chain_ignition() {
        let (mut physics, mut grid, env) = setup();
        grid.set(10, 8, 8, Block::TNT);
        place(&mut physics, &mut grid, &env, 8, 8, 8, Block::TNT);

        // First charge explodes on the 5th tick, chain fuse fires two later
        for _ in 0..5 {
            physics.tick(&mut grid, &env);
        }
        assert_eq!(grid.get(8, 8, 8), Block::AIR);
        assert_eq!(grid.get(10, 8, 8), Block::TNT);

        physics.tick(&mut grid, &env);
        physics.tick(&mut grid, &env);
        assert_eq!(grid.get(10, 8, 8), Block::AIR);
    }

    #[test]
    fn test_lava_ignites_tnt() {
        let (mut physics, mut grid, env) = setup();
        grid.set(8, 8, 8, Block::TNT);
        place(&mut physics, &mut grid, &env, 9, 8, 8, Block::LAVA);

        // The cascade activated the TNT next to fresh lava: 1-tick fuse
        physics.tick(&mut grid, &env);
        physics.tick(&mut grid, &env);
        assert_eq!(grid.get(8, 8, 8), Block::AIR);
    }

    #[test]
    fn test_removed_tnt_does_not_explode() {
        let (mut physics, mut grid, env) = setup();
        place(&mut physics, &mut grid, &env, 8, 8, 8, Block::TNT);
        place(&mut physics, &mut grid, &env, 8, 8, 8, Block::AIR);
        grid.set(8, 9, 8, Block::STONE);

        for _ in 0..8 {
            physics.tick(&mut grid, &env);
        }
        // The stale fuse found no TNT; nothing around was destroyed
        assert_eq!(grid.get(8, 9, 8), Block::STONE);
    }
}
