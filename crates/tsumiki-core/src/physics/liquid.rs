//! Liquid flow - water and lava spread, liquid collision, sponges

use glam::IVec3;
use tsumiki_blocks::Block;

use super::dispatch::{Dispatch, TickKind};
use super::engine::SimContext;
use super::queue::TickQueue;
use super::PhysicsConfig;

/// Chebyshev radius within which a sponge keeps water out
const SPONGE_RADIUS: i32 = 2;

pub struct LiquidState {
    water: TickQueue,
    lava: TickQueue,
    water_delay: u32,
    lava_delay: u32,
}

impl LiquidState {
    pub(crate) fn new(config: &PhysicsConfig) -> Self {
        Self {
            water: TickQueue::new(),
            lava: TickQueue::new(),
            water_delay: config.water_delay,
            lava_delay: config.lava_delay,
        }
    }

    /// Drop transient flow state without touching stored blocks. Called when
    /// the simulation is toggled off so a stale front cannot resurrect.
    pub fn clear(&mut self) {
        self.water.clear();
        self.lava.clear();
    }

    pub fn reset_map(&mut self) {
        self.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.water.is_empty() && self.lava.is_empty()
    }
}

pub(crate) fn register(dispatch: &mut Dispatch) {
    for id in [Block::WATER, Block::STILL_WATER] {
        dispatch.register(id, TickKind::Place, enqueue_water);
        dispatch.register(id, TickKind::Activate, enqueue_water);
        dispatch.register(id, TickKind::RandomTick, activate_water);
    }
    for id in [Block::LAVA, Block::STILL_LAVA] {
        dispatch.register(id, TickKind::Place, enqueue_lava);
        dispatch.register(id, TickKind::Activate, enqueue_lava);
        dispatch.register(id, TickKind::RandomTick, activate_lava);
    }
    dispatch.register(Block::SPONGE, TickKind::Place, place_sponge);
    dispatch.register(Block::SPONGE, TickKind::Delete, delete_sponge);
}

fn enqueue_water(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let delay = ctx.liquid.water_delay;
    ctx.liquid.water.schedule(index, delay);
}

fn enqueue_lava(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let delay = ctx.liquid.lava_delay;
    ctx.liquid.lava.schedule(index, delay);
}

pub(crate) fn tick_water(ctx: &mut SimContext<'_>) {
    let count = ctx.liquid.water.len();
    for _ in 0..count {
        let Some(index) = ctx.liquid.water.step() else {
            continue;
        };
        let block = ctx.block(index);
        if Block::is_water(block) {
            activate_water(ctx, index, block);
        }
    }
}

pub(crate) fn tick_lava(ctx: &mut SimContext<'_>) {
    let count = ctx.liquid.lava.len();
    for _ in 0..count {
        let Some(index) = ctx.liquid.lava.step() else {
            continue;
        };
        let block = ctx.block(index);
        if Block::is_lava(block) {
            activate_lava(ctx, index, block);
        }
    }
}

/// Spread water sideways and down from a cell that holds it
fn activate_water(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    for target in flow_targets(ctx, index) {
        propagate_water(ctx, target);
    }
}

fn activate_lava(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    for target in flow_targets(ctx, index) {
        propagate_lava(ctx, target);
    }
}

/// In-bounds flow destinations: the four horizontal neighbors and the cell
/// below. Liquids never flow upward.
fn flow_targets(ctx: &SimContext<'_>, index: usize) -> impl Iterator<Item = usize> {
    let p = ctx.grid.coords(index);
    let width = ctx.grid.width() as i32;
    let length = ctx.grid.length() as i32;
    let one_y = ctx.grid.one_y();

    let mut targets = [None; 5];
    if p.x > 0 {
        targets[0] = Some(index - 1);
    }
    if p.x < width - 1 {
        targets[1] = Some(index + 1);
    }
    if p.z > 0 {
        targets[2] = Some(index - width as usize);
    }
    if p.z < length - 1 {
        targets[3] = Some(index + width as usize);
    }
    if p.y > 0 {
        targets[4] = Some(index - one_y);
    }
    targets.into_iter().flatten()
}

fn propagate_water(ctx: &mut SimContext<'_>, index: usize) {
    let block = ctx.block(index);
    if Block::is_lava(block) {
        // Liquid collision hardens to stone
        ctx.set_block(index, Block::STONE);
    } else if block == Block::AIR && !near_sponge(ctx, index) {
        // The resulting Place dispatch re-enqueues the new cell
        ctx.set_block(index, Block::WATER);
    }
}

fn propagate_lava(ctx: &mut SimContext<'_>, index: usize) {
    let block = ctx.block(index);
    if Block::is_water(block) {
        ctx.set_block(index, Block::STONE);
    } else if block == Block::AIR {
        ctx.set_block(index, Block::LAVA);
    }
}

fn near_sponge(ctx: &SimContext<'_>, index: usize) -> bool {
    let center = ctx.grid.coords(index);
    cube(center, SPONGE_RADIUS).any(|p| {
        ctx.grid.contains(p)
            && ctx.grid.get(p.x as usize, p.y as usize, p.z as usize) == Block::SPONGE
    })
}

/// A placed sponge dries all water in its 5x5x5 volume
fn place_sponge(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let center = ctx.grid.coords(index);
    for p in cube(center, SPONGE_RADIUS) {
        if !ctx.grid.contains(p) {
            continue;
        }
        let i = ctx.grid.idx(p.x as usize, p.y as usize, p.z as usize);
        if Block::is_water(ctx.block(i)) {
            ctx.set_block(i, Block::AIR);
        }
    }
}

/// Removing a sponge lets the surrounding water flow back: re-queue every
/// water cell just outside the dried volume.
fn delete_sponge(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let center = ctx.grid.coords(index);
    let delay = ctx.liquid.water_delay;
    for p in cube(center, SPONGE_RADIUS + 1) {
        if !ctx.grid.contains(p) {
            continue;
        }
        let i = ctx.grid.idx(p.x as usize, p.y as usize, p.z as usize);
        if Block::is_water(ctx.block(i)) {
            ctx.liquid.water.schedule(i, delay);
        }
    }
}

fn cube(center: IVec3, radius: i32) -> impl Iterator<Item = IVec3> {
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius).flat_map(move |dz| {
            (-radius..=radius).map(move |dx| center + IVec3::new(dx, dy, dz))
        })
    })
}
