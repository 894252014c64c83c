//! Terminal Main Memory.
//!
//! This module implements the last level of a hierarchy. It has no tag state: every
//! access is served, and only the request and byte counts are recorded.

use serde::Serialize;

use super::traits::MemoryHandler;

/// Request counters of the terminal memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryTraffic {
    /// Read requests (fills) received.
    pub reads: u64,
    /// Write requests (writebacks) received.
    pub writes: u64,
    /// Bytes read.
    pub bytes_read: u64,
    /// Bytes written.
    pub bytes_written: u64,
}

/// Main memory at the end of a cache hierarchy.
#[derive(Clone, Debug, Default)]
pub struct MainMemory {
    traffic: MemoryTraffic,
}

impl MainMemory {
    /// Creates a memory with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Traffic received so far.
    pub const fn traffic(&self) -> MemoryTraffic {
        self.traffic
    }
}

impl MemoryHandler for MainMemory {
    fn access(&mut self, _addr: u64, bytes: usize, is_store: bool) {
        if is_store {
            self.traffic.writes += 1;
            self.traffic.bytes_written += bytes as u64;
        } else {
            self.traffic.reads += 1;
            self.traffic.bytes_read += bytes as u64;
        }
    }

    fn name(&self) -> &str {
        "DRAM"
    }

    fn as_main_memory(&self) -> Option<&MainMemory> {
        Some(self)
    }
}
