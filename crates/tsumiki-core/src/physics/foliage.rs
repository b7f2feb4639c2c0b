//! Foliage - sunlight-driven growth and decay on random ticks

use glam::IVec3;
use rand::Rng;
use tsumiki_blocks::Block;

use super::dispatch::{Dispatch, TickKind};
use super::engine::SimContext;

pub(crate) fn register(dispatch: &mut Dispatch) {
    dispatch.register(Block::SAPLING, TickKind::RandomTick, tick_sapling);
    dispatch.register(Block::GRASS, TickKind::RandomTick, tick_grass);
    dispatch.register(Block::DIRT, TickKind::RandomTick, tick_dirt);
    dispatch.register(Block::DANDELION, TickKind::RandomTick, tick_flower);
    dispatch.register(Block::ROSE, TickKind::RandomTick, tick_flower);
    dispatch.register(Block::BROWN_MUSHROOM, TickKind::RandomTick, tick_mushroom);
    dispatch.register(Block::RED_MUSHROOM, TickKind::RandomTick, tick_mushroom);
}

fn tick_grass(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    if !ctx.is_lit(index) {
        ctx.set_block(index, Block::DIRT);
    }
}

fn tick_dirt(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    if ctx.is_lit(index) {
        ctx.set_block(index, Block::GRASS);
    }
}

/// Flowers wither without sunlight
fn tick_flower(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    if !ctx.is_lit(index) {
        ctx.set_block(index, Block::AIR);
    }
}

/// Mushrooms die when sunlight reaches them
fn tick_mushroom(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    if ctx.is_lit(index) {
        ctx.set_block(index, Block::AIR);
    }
}

fn tick_sapling(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    if ctx.is_lit(index) {
        grow_tree(ctx, index);
    } else {
        ctx.set_block(index, Block::AIR);
    }
}

/// Replace a sapling with a classic tree: a 4-6 cell trunk, two wide leaf
/// layers below the top and a capped crown. Grows only when the trunk fits
/// inside the grid and has free space; leaves only replace air.
fn grow_tree(ctx: &mut SimContext<'_>, index: usize) {
    let base = ctx.grid.coords(index);
    let trunk = 4 + ctx.rng.gen_range(0..3);

    if base.y + trunk + 1 >= ctx.grid.height() as i32 {
        return;
    }
    for dy in 1..trunk {
        let p = base + IVec3::new(0, dy, 0);
        if ctx.grid.get(p.x as usize, p.y as usize, p.z as usize) != Block::AIR {
            return;
        }
    }

    for dy in 0..trunk {
        let p = base + IVec3::new(0, dy, 0);
        ctx.set_block(ctx.grid.idx(p.x as usize, p.y as usize, p.z as usize), Block::LOG);
    }

    // Wide layers two and three below the crown, narrow crown on top
    for dy in trunk - 2..=trunk - 1 {
        leaf_layer(ctx, base + IVec3::new(0, dy, 0), 2);
    }
    for dy in trunk..=trunk + 1 {
        leaf_layer(ctx, base + IVec3::new(0, dy, 0), 1);
    }
}

fn leaf_layer(ctx: &mut SimContext<'_>, center: IVec3, radius: i32) {
    for dz in -radius..=radius {
        for dx in -radius..=radius {
            let p = center + IVec3::new(dx, 0, dz);
            if !ctx.grid.contains(p) {
                continue;
            }
            let i = ctx.grid.idx(p.x as usize, p.y as usize, p.z as usize);
            if ctx.block(i) == Block::AIR {
                ctx.set_block(i, Block::LEAVES);
            }
        }
    }
}
