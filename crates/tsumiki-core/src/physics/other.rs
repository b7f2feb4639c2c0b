//! Miscellaneous reactive blocks

use tsumiki_blocks::Block;

use super::dispatch::{Dispatch, TickKind};
use super::engine::SimContext;

pub(crate) fn register(dispatch: &mut Dispatch) {
    dispatch.register(Block::SLAB, TickKind::Place, place_slab);
}

/// A slab placed directly on another slab merges into a double slab
fn place_slab(ctx: &mut SimContext<'_>, index: usize, _block: u8) {
    let one_y = ctx.grid.one_y();
    if index < one_y {
        return;
    }
    let below = index - one_y;
    if ctx.block(below) == Block::SLAB {
        ctx.set_block(below, Block::DOUBLE_SLAB);
        ctx.set_block(index, Block::AIR);
    }
}
