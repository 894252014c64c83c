//! Memory handler trait for hierarchy levels.
//!
//! This module defines the `MemoryHandler` trait implemented by everything that can
//! receive a forwarded access. It provides:
//! 1. **Access:** The hot-path `access(addr, bytes, is_store)` contract, called once per reference.
//! 2. **Identification:** A short name for logs and reports.
//! 3. **Downcasting:** Optional cast to `MainMemory` for reading terminal traffic counters.
//!
//! Cache levels are driven through the [`Hierarchy`](super::Hierarchy), which forwards
//! their misses; a bare `MemoryHandler` is the terminal end of a chain.

use super::memory::MainMemory;

/// Receiver of memory accesses: a cache level or a terminal memory model.
pub trait MemoryHandler: Send {
    /// Handles one access of `bytes` bytes at `addr`.
    fn access(&mut self, addr: u64, bytes: usize, is_store: bool);

    /// Returns a short name for this handler (e.g., `"DRAM"`).
    fn name(&self) -> &str {
        "memory"
    }

    /// Returns a reference as `MainMemory` if this handler is the terminal memory; otherwise `None`.
    fn as_main_memory(&self) -> Option<&MainMemory> {
        None
    }
}
