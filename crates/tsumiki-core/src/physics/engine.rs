//! The simulation engine - change cascade, tick driver, random sampling

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tsumiki_blocks::{Block, Blocks};

use super::config::PhysicsConfig;
use super::dispatch::{BlockHandler, Dispatch, TickKind};
use super::falling::{self, FallingState};
use super::liquid::{self, LiquidState};
use super::tnt::{self, TntState};
use super::{foliage, other};
use crate::world::{VoxelGrid, WorldEnv, MAX_CELLS};

/// Edge length of the boxes sampled by the ambient random tick
const SAMPLE_BOX: usize = 16;
/// Random ticks drawn per box per simulation step
const TICKS_PER_BOX: usize = 3;

/// One authoritative block mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockChange {
    pub index: usize,
    pub old: u8,
    pub new: u8,
}

/// Borrowed state handed to block handlers.
///
/// Handlers mutate the world through [`SimContext::set_block`], which queues
/// the change for the same place/delete/activate cascade that player edits
/// get, so render or network layers observing the engine stay in sync.
pub struct SimContext<'a> {
    pub grid: &'a mut VoxelGrid,
    pub env: &'a WorldEnv,
    pub blocks: &'a Blocks,
    pub rng: &'a mut StdRng,
    pub falling: &'a mut FallingState,
    pub liquid: &'a mut LiquidState,
    pub tnt: &'a mut TntState,
    pending: &'a mut VecDeque<BlockChange>,
    applied: &'a mut Vec<BlockChange>,
}

impl SimContext<'_> {
    /// Current block id at a cell
    pub fn block(&self, index: usize) -> u8 {
        self.grid.get_index(index)
    }

    /// Write a block and queue the change for cascade dispatch. Writes that
    /// do not change the stored id are dropped.
    pub fn set_block(&mut self, index: usize, new: u8) {
        let old = self.grid.get_index(index);
        if old == new {
            return;
        }
        self.grid.set_index(index, new);
        let change = BlockChange { index, old, new };
        self.applied.push(change);
        self.pending.push_back(change);
    }

    /// Sunlight query for a cell given by flat index
    pub fn is_lit(&self, index: usize) -> bool {
        let p = self.grid.coords(index);
        self.grid
            .is_lit(self.blocks, p.x as usize, p.y as usize, p.z as usize)
    }
}

/// The block-level simulation engine.
///
/// Owns the behavior dispatch tables and the five subsystems; the voxel grid
/// itself belongs to the world session and is passed into every call, so a
/// world reload simply means calling [`Physics::reset_map`] and passing the
/// new grid from then on.
pub struct Physics {
    dispatch: Dispatch,
    blocks: Blocks,
    enabled: bool,
    rng: StdRng,
    pending: VecDeque<BlockChange>,
    applied: Vec<BlockChange>,
    falling: FallingState,
    liquid: LiquidState,
    tnt: TntState,
}

impl Physics {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic engine for reproducible simulation runs
    pub fn with_seed(config: PhysicsConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PhysicsConfig, rng: StdRng) -> Self {
        let mut dispatch = Dispatch::new();
        falling::register(&mut dispatch);
        liquid::register(&mut dispatch);
        tnt::register(&mut dispatch);
        foliage::register(&mut dispatch);
        other::register(&mut dispatch);

        Self {
            dispatch,
            blocks: Blocks::new(),
            enabled: config.enabled,
            rng,
            pending: VecDeque::new(),
            applied: Vec::new(),
            falling: FallingState::new(&config),
            liquid: LiquidState::new(&config),
            tnt: TntState::new(&config),
        }
    }

    /// Construction-time extension point: overwrite the handler for
    /// `(block, kind)`. Must not be called once the engine is ticking.
    pub fn register(&mut self, block: u8, kind: TickKind, handler: BlockHandler) {
        self.dispatch.register(block, kind, handler);
    }

    pub fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle the simulation. Turning it off drops the liquid subsystem's
    /// transient queues so a stale flow front cannot resurrect on re-enable;
    /// every other queue is preserved.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.liquid.clear();
            log::debug!("physics disabled, liquid queues cleared");
        }
    }

    /// World session replaced: drop every queued event and change record.
    /// Indices into the old grid must never survive into the new one.
    pub fn reset_map(&mut self, grid: &VoxelGrid) {
        assert!(
            grid.volume() <= MAX_CELLS,
            "grid volume exceeds packed event capacity"
        );
        self.falling.reset_map();
        self.liquid.reset_map();
        self.tnt.reset_map();
        self.pending.clear();
        self.applied.clear();
        log::debug!(
            "physics reset for {}x{}x{} map",
            grid.width(),
            grid.height(),
            grid.length()
        );
    }

    /// Changes the engine itself made since the last drain, in application
    /// order, for render/network synchronization.
    pub fn drain_applied(&mut self) -> Vec<BlockChange> {
        std::mem::take(&mut self.applied)
    }

    /// Report an authoritative block mutation (the grid already holds `new`).
    /// Runs the place/delete dispatch and the neighbor activation cascade
    /// synchronously to completion. Ignored while the simulation is disabled.
    pub fn notify_block_changed(
        &mut self,
        grid: &mut VoxelGrid,
        env: &WorldEnv,
        index: usize,
        old: u8,
        new: u8,
    ) {
        if !self.enabled {
            return;
        }
        self.pending.push_back(BlockChange { index, old, new });
        self.drain_pending(grid, env);
    }

    /// Advance the simulation by one step: liquids first (lava, then water),
    /// then gravity drops and fuses, then the ambient random-tick sampler.
    pub fn tick(&mut self, grid: &mut VoxelGrid, env: &WorldEnv) {
        if !self.enabled {
            return;
        }
        {
            let (_, mut ctx) = self.split(grid, env);
            liquid::tick_lava(&mut ctx);
            liquid::tick_water(&mut ctx);
            falling::tick(&mut ctx);
            tnt::tick(&mut ctx);
        }
        self.drain_pending(grid, env);
        self.tick_random_blocks(grid, env);
        self.drain_pending(grid, env);
    }

    /// Split `self` into the immutable dispatch tables and a mutable handler
    /// context, so a looked-up handler can run against the rest of the state.
    fn split<'a>(
        &'a mut self,
        grid: &'a mut VoxelGrid,
        env: &'a WorldEnv,
    ) -> (&'a Dispatch, SimContext<'a>) {
        let Self {
            dispatch,
            blocks,
            rng,
            pending,
            applied,
            falling,
            liquid,
            tnt,
            ..
        } = self;
        (
            &*dispatch,
            SimContext {
                grid,
                env,
                blocks: &*blocks,
                rng,
                falling,
                liquid,
                tnt,
                pending,
                applied,
            },
        )
    }

    fn invoke(&mut self, grid: &mut VoxelGrid, env: &WorldEnv, kind: TickKind, index: usize, block: u8) {
        let Some(handler) = self.dispatch.handler(kind, block) else {
            return;
        };
        let (_, mut ctx) = self.split(grid, env);
        handler(&mut ctx, index, block);
    }

    fn activate(&mut self, grid: &mut VoxelGrid, env: &WorldEnv, index: usize) {
        let block = grid.get_index(index);
        self.invoke(grid, env, TickKind::Activate, index, block);
    }

    fn drain_pending(&mut self, grid: &mut VoxelGrid, env: &WorldEnv) {
        while let Some(change) = self.pending.pop_front() {
            self.apply_change(grid, env, change);
        }
    }

    fn apply_change(&mut self, grid: &mut VoxelGrid, env: &WorldEnv, change: BlockChange) {
        let p = grid.coords(change.index);
        let (x, y, z) = (p.x as usize, p.y as usize, p.z as usize);

        // Removing a boundary block inside the water band floods the cell
        // instead of leaving air behind.
        let mut block = change.new;
        if block == Block::AIR && Self::is_edge_water(grid, env, x, y, z) {
            block = Block::STILL_WATER;
            grid.set_index(change.index, block);
            self.applied.push(BlockChange {
                index: change.index,
                old: change.new,
                new: block,
            });
        }

        if block == Block::AIR {
            self.invoke(grid, env, TickKind::Delete, change.index, change.old);
        } else {
            self.invoke(grid, env, TickKind::Place, change.index, block);
        }

        // Activate every in-bounds axis neighbor with its own current id
        let one_y = grid.one_y();
        if x > 0 {
            self.activate(grid, env, change.index - 1);
        }
        if x < grid.width() - 1 {
            self.activate(grid, env, change.index + 1);
        }
        if z > 0 {
            self.activate(grid, env, change.index - grid.width());
        }
        if z < grid.length() - 1 {
            self.activate(grid, env, change.index + grid.width());
        }
        if y > 0 {
            self.activate(grid, env, change.index - one_y);
        }
        if y < grid.height() - 1 {
            self.activate(grid, env, change.index + one_y);
        }
    }

    fn is_edge_water(grid: &VoxelGrid, env: &WorldEnv, x: usize, y: usize, z: usize) -> bool {
        if !env.edge_is_water() {
            return false;
        }
        y >= env.sides_height
            && y < env.edge_height
            && (x == 0 || z == 0 || x == grid.width() - 1 || z == grid.length() - 1)
    }

    /// Ambient behavior sampler: for every 16x16x16 box (clamped at the grid
    /// edges), draw three uniform indices in the flat range between the box's
    /// corner cells and dispatch a random tick for whatever block occupies
    /// each. A statistical contract, not a per-cell schedule.
    fn tick_random_blocks(&mut self, grid: &mut VoxelGrid, env: &WorldEnv) {
        let (w, h, l) = (grid.width(), grid.height(), grid.length());
        let (x_max, y_max, z_max) = (w - 1, h - 1, l - 1);
        let (dispatch, mut ctx) = self.split(grid, env);

        for y in (0..h).step_by(SAMPLE_BOX) {
            for z in (0..l).step_by(SAMPLE_BOX) {
                for x in (0..w).step_by(SAMPLE_BOX) {
                    let lo = ctx.grid.idx(x, y, z);
                    let hi = ctx.grid.idx(
                        (x + SAMPLE_BOX - 1).min(x_max),
                        (y + SAMPLE_BOX - 1).min(y_max),
                        (z + SAMPLE_BOX - 1).min(z_max),
                    );
                    for _ in 0..TICKS_PER_BOX {
                        // A box collapsed to a single cell has lo == hi
                        let index = if hi > lo { ctx.rng.gen_range(lo..hi) } else { lo };
                        let block = ctx.grid.get_index(index);
                        if let Some(handler) = dispatch.handler(TickKind::RandomTick, block) {
                            handler(&mut ctx, index, block);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    thread_local! {
        static CALLS: RefCell<Vec<(usize, u8)>> = const { RefCell::new(Vec::new()) };
    }

    fn recording_handler(_: &mut SimContext<'_>, index: usize, block: u8) {
        CALLS.with(|calls| calls.borrow_mut().push((index, block)));
    }

    fn take_calls() -> Vec<(usize, u8)> {
        CALLS.with(|calls| std::mem::take(&mut *calls.borrow_mut()))
    }

    fn setup(w: usize, h: usize, l: usize) -> (Physics, VoxelGrid, WorldEnv) {
        let grid = VoxelGrid::new(w, h, l).unwrap();
        let env = WorldEnv::default();
        let physics = Physics::with_seed(PhysicsConfig::default(), 42);
        (physics, grid, env)
    }

    #[test]
    fn test_cascade_activates_all_six_neighbors_once() {
        let (mut physics, mut grid, env) = setup(8, 8, 8);
        take_calls();

        // Six distinct cloth blocks around the changed cell, each with a
        // recording activate handler.
        let center = (4usize, 4usize, 4usize);
        let neighbors = [
            (3, 4, 4, Block::RED),
            (5, 4, 4, Block::ORANGE),
            (4, 4, 3, Block::YELLOW),
            (4, 4, 5, Block::LIME),
            (4, 3, 4, Block::GREEN),
            (4, 5, 4, Block::TEAL),
        ];
        for &(x, y, z, id) in &neighbors {
            grid.set(x, y, z, id);
            physics.register(id, TickKind::Activate, recording_handler);
        }

        let index = grid.idx(center.0, center.1, center.2);
        grid.set_index(index, Block::STONE);
        physics.notify_block_changed(&mut grid, &env, index, Block::AIR, Block::STONE);

        let mut calls = take_calls();
        calls.sort();
        let mut expected: Vec<(usize, u8)> = neighbors
            .iter()
            .map(|&(x, y, z, id)| (grid.idx(x, y, z), id))
            .collect();
        expected.sort();
        assert_eq!(calls, expected);
    }

    #[test]
    fn test_corner_cell_cascade_skips_out_of_bounds() {
        let (mut physics, mut grid, env) = setup(8, 8, 8);
        physics.register(Block::AIR, TickKind::Activate, recording_handler);
        take_calls();

        let index = grid.idx(0, 0, 0);
        grid.set_index(index, Block::STONE);
        physics.notify_block_changed(&mut grid, &env, index, Block::AIR, Block::STONE);

        // Only the three in-bounds neighbors fire
        assert_eq!(take_calls().len(), 3);
    }

    #[test]
    fn test_edge_water_override() {
        let (mut physics, mut grid, _) = setup(8, 16, 8);
        let env = WorldEnv {
            edge_block: Block::STILL_WATER,
            sides_height: 0,
            edge_height: 10,
        };
        physics.register(Block::STILL_WATER, TickKind::Place, recording_handler);
        physics.register(Block::STONE, TickKind::Delete, recording_handler);
        take_calls();

        for z in 0..8 {
            let index = grid.idx(0, 5, z);
            grid.set_index(index, Block::AIR);
            physics.notify_block_changed(&mut grid, &env, index, Block::STONE, Block::AIR);

            assert_eq!(grid.get_index(index), Block::STILL_WATER);
            let calls = take_calls();
            assert!(calls.contains(&(index, Block::STILL_WATER)), "Place(still_water) must fire");
            assert!(!calls.iter().any(|&(_, b)| b == Block::STONE), "Delete must not fire");
        }
    }

    #[test]
    fn test_edge_water_does_not_apply_above_band() {
        let (mut physics, mut grid, _) = setup(8, 16, 8);
        let env = WorldEnv {
            edge_block: Block::STILL_WATER,
            sides_height: 0,
            edge_height: 10,
        };
        let index = grid.idx(0, 12, 3);
        grid.set_index(index, Block::AIR);
        physics.notify_block_changed(&mut grid, &env, index, Block::STONE, Block::AIR);
        assert_eq!(grid.get_index(index), Block::AIR);
    }

    #[test]
    fn test_edge_water_requires_water_edge_block() {
        let (mut physics, mut grid, _) = setup(8, 16, 8);
        let env = WorldEnv {
            edge_block: Block::STILL_LAVA,
            sides_height: 0,
            edge_height: 10,
        };
        let index = grid.idx(0, 5, 3);
        grid.set_index(index, Block::AIR);
        physics.notify_block_changed(&mut grid, &env, index, Block::STONE, Block::AIR);
        assert_eq!(grid.get_index(index), Block::AIR);
    }

    #[test]
    fn test_no_delta_change_still_cascades() {
        let (mut physics, mut grid, env) = setup(8, 8, 8);
        physics.register(Block::AIR, TickKind::Activate, recording_handler);
        take_calls();

        let index = grid.idx(4, 4, 4);
        grid.set_index(index, Block::STONE);
        physics.notify_block_changed(&mut grid, &env, index, Block::STONE, Block::STONE);
        assert_eq!(take_calls().len(), 6);
    }

    #[test]
    fn test_notifications_ignored_while_disabled() {
        let (mut physics, mut grid, env) = setup(8, 8, 8);
        physics.register(Block::AIR, TickKind::Activate, recording_handler);
        take_calls();

        physics.set_enabled(false);
        let index = grid.idx(4, 4, 4);
        grid.set_index(index, Block::STONE);
        physics.notify_block_changed(&mut grid, &env, index, Block::AIR, Block::STONE);
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_random_tick_samples_stay_in_bounds() {
        // Odd dimensions force clamped columns
        let (mut physics, mut grid, env) = setup(21, 9, 35);
        physics.register(Block::AIR, TickKind::RandomTick, recording_handler);
        take_calls();

        for _ in 0..50 {
            physics.tick(&mut grid, &env);
        }
        let calls = take_calls();
        assert!(!calls.is_empty());
        for (index, _) in calls {
            assert!(index < grid.volume());
        }
    }

    #[test]
    fn test_random_tick_samples_single_cell_grid() {
        // The box degenerates to one cell; that cell still gets its ticks
        let (mut physics, mut grid, env) = setup(1, 1, 1);
        physics.register(Block::AIR, TickKind::RandomTick, recording_handler);
        take_calls();

        physics.tick(&mut grid, &env);
        assert_eq!(take_calls(), vec![(0, Block::AIR); 3]);
    }

    #[test]
    fn test_random_tick_volume_per_step() {
        // A single full column draws exactly three samples per tick
        let (mut physics, mut grid, env) = setup(16, 16, 16);
        physics.register(Block::AIR, TickKind::RandomTick, recording_handler);
        take_calls();

        physics.tick(&mut grid, &env);
        assert_eq!(take_calls().len(), 3);
    }

    #[test]
    fn test_tick_noop_while_disabled() {
        let (mut physics, mut grid, env) = setup(16, 16, 16);
        physics.register(Block::AIR, TickKind::RandomTick, recording_handler);
        take_calls();

        physics.set_enabled(false);
        physics.tick(&mut grid, &env);
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_applied_changes_record_engine_mutations() {
        let (mut physics, mut grid, _) = setup(8, 16, 8);
        let env = WorldEnv {
            edge_block: Block::STILL_WATER,
            sides_height: 0,
            edge_height: 10,
        };
        let index = grid.idx(0, 5, 3);
        grid.set_index(index, Block::AIR);
        physics.notify_block_changed(&mut grid, &env, index, Block::STONE, Block::AIR);

        let applied = physics.drain_applied();
        assert!(applied.contains(&BlockChange {
            index,
            old: Block::AIR,
            new: Block::STILL_WATER,
        }));
        // Drained log is empty afterwards
        assert!(physics.drain_applied().is_empty());
    }
}
