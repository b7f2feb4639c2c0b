//! Per-block-id handler tables for the four event kinds

use super::engine::SimContext;

/// The four events a block type can react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickKind {
    /// An adjacent cell changed
    Activate,
    /// Ambient statistical tick
    RandomTick,
    /// This block was placed (or appeared through simulation)
    Place,
    /// This block was removed
    Delete,
}

impl TickKind {
    pub const ALL: [TickKind; 4] = [
        TickKind::Activate,
        TickKind::RandomTick,
        TickKind::Place,
        TickKind::Delete,
    ];
}

/// A block behavior routine. Receives the cell's flat index and the block id
/// the dispatch saw at invocation time; handlers must re-check the current id
/// when fired from a delay queue, since the cell may have changed since.
pub type BlockHandler = fn(&mut SimContext<'_>, usize, u8);

/// Fixed lookup tables mapping block id to an optional handler per event
/// kind. Built once at engine construction; lookup is O(1) and allocation
/// free, and unregistered ids are no-ops.
pub struct Dispatch {
    on_activate: [Option<BlockHandler>; 256],
    on_random_tick: [Option<BlockHandler>; 256],
    on_place: [Option<BlockHandler>; 256],
    on_delete: [Option<BlockHandler>; 256],
}

impl Dispatch {
    pub fn new() -> Self {
        Self {
            on_activate: [None; 256],
            on_random_tick: [None; 256],
            on_place: [None; 256],
            on_delete: [None; 256],
        }
    }

    fn table(&self, kind: TickKind) -> &[Option<BlockHandler>; 256] {
        match kind {
            TickKind::Activate => &self.on_activate,
            TickKind::RandomTick => &self.on_random_tick,
            TickKind::Place => &self.on_place,
            TickKind::Delete => &self.on_delete,
        }
    }

    fn table_mut(&mut self, kind: TickKind) -> &mut [Option<BlockHandler>; 256] {
        match kind {
            TickKind::Activate => &mut self.on_activate,
            TickKind::RandomTick => &mut self.on_random_tick,
            TickKind::Place => &mut self.on_place,
            TickKind::Delete => &mut self.on_delete,
        }
    }

    /// Register `handler` for `(block, kind)`, overwriting any prior handler
    pub fn register(&mut self, block: u8, kind: TickKind, handler: BlockHandler) {
        self.table_mut(kind)[block as usize] = Some(handler);
    }

    pub fn handler(&self, kind: TickKind, block: u8) -> Option<BlockHandler> {
        self.table(kind)[block as usize]
    }
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}
