//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the line that was filled earliest, regardless of how recently
//! it was accessed. The clock advances once per access and a slot is stamped only
//! when a line is installed into it; hits leave the stamp alone.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: no-op
//!   - `choose_victim()`: O(W)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::{ReplacementPolicy, oldest_or_empty};
use crate::cache::line::LineState;

/// FIFO Policy state.
#[derive(Clone, Debug, Default)]
pub struct FifoPolicy {
    /// Current access ordinal.
    clock: u64,
}

impl FifoPolicy {
    /// Creates a new FIFO policy with its clock at zero.
    pub const fn new() -> Self {
        Self { clock: 0 }
    }

    /// Current value of the access clock.
    pub const fn clock(&self) -> u64 {
        self.clock
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn begin_access(&mut self) {
        self.clock += 1;
    }

    /// Returns the first empty slot, else the earliest filled one.
    fn choose_victim<'a, I>(&mut self, lines: I) -> usize
    where
        I: ExactSizeIterator<Item = &'a LineState>,
    {
        oldest_or_empty(lines)
    }

    /// Stamps the new line with the ordinal of the access that filled it.
    fn fill_stamp(&mut self) -> u64 {
        self.clock
    }
}
