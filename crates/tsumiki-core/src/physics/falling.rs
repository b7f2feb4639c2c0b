//! Gravity blocks - sand and gravel drop through air and liquids

use tsumiki_blocks::Block;

use super::dispatch::{Dispatch, TickKind};
use super::engine::SimContext;
use super::queue::TickQueue;
use super::PhysicsConfig;

pub struct FallingState {
    queue: TickQueue,
    delay: u32,
}

impl FallingState {
    pub(crate) fn new(config: &PhysicsConfig) -> Self {
        Self {
            queue: TickQueue::new(),
            delay: config.fall_delay,
        }
    }

    pub fn reset_map(&mut self) {
        self.queue.clear();
    }
}

pub(crate) fn register(dispatch: &mut Dispatch) {
    for id in [Block::SAND, Block::GRAVEL] {
        dispatch.register(id, TickKind::Place, start_fall);
        dispatch.register(id, TickKind::Activate, start_fall);
    }
}

fn start_fall(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let delay = ctx.falling.delay;
    ctx.falling.queue.schedule(index, delay);
}

pub(crate) fn tick(ctx: &mut SimContext<'_>) {
    let count = ctx.falling.queue.len();
    for _ in 0..count {
        let Some(index) = ctx.falling.queue.step() else {
            continue;
        };
        let block = ctx.block(index);
        // The cell may have changed since the drop was scheduled
        if block != Block::SAND && block != Block::GRAVEL {
            continue;
        }
        do_fall(ctx, index, block);
    }
}

/// Scan straight down through air and liquid cells and move the block to the
/// lowest one, displacing any liquid it lands in. The resulting cascade
/// re-activates the cell above, so stacked columns fall block by block.
fn do_fall(ctx: &mut SimContext<'_>, start: usize, block: u8) {
    let one_y = ctx.grid.one_y();
    let mut index = start;
    let mut found = None;
    while index >= one_y {
        index -= one_y;
        let below = ctx.grid.get_index(index);
        if below == Block::AIR || Block::is_liquid(below) {
            found = Some(index);
        } else {
            break;
        }
    }
    let Some(dest) = found else { return };
    ctx.set_block(dest, block);
    ctx.set_block(start, Block::AIR);
}
