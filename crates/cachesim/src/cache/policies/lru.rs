//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been touched for the longest time.
//! Instead of a per-set usage stack it keeps one monotonically increasing clock per
//! cache: every access advances it, and every hit or fill stamps the touched slot
//! with the current value. The victim is the slot with the smallest stamp.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(1)
//!   - `choose_victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** one `u64` stamp per slot plus one clock
//! - **Best Case:** Workloads with strong temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::{ReplacementPolicy, oldest_or_empty};
use crate::cache::line::LineState;

/// LRU Policy state.
#[derive(Clone, Debug, Default)]
pub struct LruPolicy {
    /// Current touch ordinal.
    clock: u64,
}

impl LruPolicy {
    /// Creates a new LRU policy with its clock at zero.
    pub const fn new() -> Self {
        Self { clock: 0 }
    }

    /// Current value of the touch clock.
    pub const fn clock(&self) -> u64 {
        self.clock
    }
}

impl ReplacementPolicy for LruPolicy {
    fn begin_access(&mut self) {
        self.clock += 1;
    }

    /// Marks `line` as the most recently used.
    fn on_hit(&mut self, line: &mut LineState) {
        line.stamp = self.clock;
    }

    /// Returns the first empty slot, else the least recently touched one.
    ///
    /// Ties go to the slot encountered first in scan order.
    fn choose_victim<'a, I>(&mut self, lines: I) -> usize
    where
        I: ExactSizeIterator<Item = &'a LineState>,
    {
        oldest_or_empty(lines)
    }

    /// Stamps the new line with the current clock, then advances it.
    fn fill_stamp(&mut self) -> u64 {
        let stamp = self.clock;
        self.clock += 1;
        stamp
    }
}
