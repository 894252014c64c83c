use std::sync::{Arc, Mutex};

use cachesim_core::hierarchy::MemoryHandler;
use mockall::mock;

mock! {
    pub Memory {}
    impl MemoryHandler for Memory {
        fn access(&mut self, addr: u64, bytes: usize, is_store: bool);
    }
}

/// One request observed by a [`RecordingMemory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Requested address.
    pub addr: u64,
    /// Request size.
    pub bytes: usize,
    /// Writeback (`true`) or fill (`false`).
    pub is_store: bool,
}

impl Request {
    /// A fill of `bytes` bytes at `addr`.
    pub const fn fill(addr: u64, bytes: usize) -> Self {
        Self {
            addr,
            bytes,
            is_store: false,
        }
    }

    /// A writeback of `bytes` bytes at `addr`.
    pub const fn writeback(addr: u64, bytes: usize) -> Self {
        Self {
            addr,
            bytes,
            is_store: true,
        }
    }
}

/// Handle on the requests a [`RecordingMemory`] has seen, kept after the
/// memory itself moves into a hierarchy.
pub type Traffic = Arc<Mutex<Vec<Request>>>;

/// Terminal memory that records every request in order.
pub struct RecordingMemory {
    log: Traffic,
}

impl RecordingMemory {
    /// Creates the memory and a handle to its request log.
    pub fn new() -> (Self, Traffic) {
        let log = Traffic::default();
        (
            Self {
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl MemoryHandler for RecordingMemory {
    fn access(&mut self, addr: u64, bytes: usize, is_store: bool) {
        self.log.lock().unwrap().push(Request {
            addr,
            bytes,
            is_store,
        });
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Snapshot of the recorded requests.
pub fn requests(traffic: &Traffic) -> Vec<Request> {
    traffic.lock().unwrap().clone()
}
