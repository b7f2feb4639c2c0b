//! Packed delay queue for deferred block events

use std::collections::VecDeque;

/// Bit position of the delay field inside a packed event
pub const TICK_SHIFT: u32 = 27;
/// Low 27 bits: cell position index
pub const POS_MASK: u32 = 0x07FF_FFFF;
/// High 5 bits: remaining delay in ticks
pub const TICK_MASK: u32 = 0xF800_0000;
/// Largest representable delay
pub const MAX_DELAY: u32 = TICK_MASK >> TICK_SHIFT;

/// FIFO of (position, remaining-delay) events packed into one `u32` each.
///
/// This is round-robin scheduling, not a priority queue: every `step` pass
/// advances the front entry, re-queueing it until its delay reaches zero.
/// Ready and not-yet-ready entries interleave, so events fire no earlier than
/// their scheduled delay but not necessarily in delay order.
#[derive(Default)]
pub struct TickQueue {
    entries: VecDeque<u32>,
}

impl TickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a cell for processing after `delay` ticks.
    ///
    /// Panics when the position or delay exceed the packed encoding's
    /// capacity; that is a construction-time mismatch between grid size and
    /// the 27/5-bit split, not a recoverable condition.
    pub fn schedule(&mut self, index: usize, delay: u32) {
        assert!(index as u64 <= POS_MASK as u64, "cell index {index} exceeds packed capacity");
        assert!(delay <= MAX_DELAY, "delay {delay} exceeds packed capacity");
        self.entries.push_back(index as u32 | (delay << TICK_SHIFT));
    }

    /// Advance the front entry. Returns the position when its delay has
    /// elapsed; otherwise decrements the delay, re-queues it at the back and
    /// returns `None`. Returns `None` on an empty queue as well.
    pub fn step(&mut self) -> Option<usize> {
        let packed = self.entries.pop_front()?;
        let delay = (packed & TICK_MASK) >> TICK_SHIFT;
        let index = (packed & POS_MASK) as usize;
        if delay > 0 {
            self.entries.push_back(index as u32 | ((delay - 1) << TICK_SHIFT));
            return None;
        }
        Some(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
