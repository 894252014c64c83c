//! Cache hierarchy simulator library.
//!
//! This crate models the occupancy and replacement behaviour of hardware caches with the following:
//! 1. **Cache:** Set-associative and fully-associative tag stores with Random, LRU and FIFO replacement.
//! 2. **Hierarchy:** Levels linked by id, with depth-first writeback and fill forwarding to main memory.
//! 3. **Configuration:** `sets:ways:blocksize[:policy]` descriptors and JSON hierarchy documents.
//! 4. **Statistics:** Per-cache counters reported as text or JSON lines when a cache is dropped.
//! 5. **Simulation:** Memory-trace reading and replay through a configured hierarchy.
//!
//! Data contents, timing, and coherence are not modelled.

/// Common types and constants (address decoding, access kinds, errors).
pub mod common;
/// Simulator configuration (defaults, policies, geometry, hierarchy documents).
pub mod config;
/// Single cache level (line state, tag stores, replacement policies).
pub mod cache;
/// Multi-level composition (registry, links, terminal memory, builder).
pub mod hierarchy;
/// Trace reader and replay driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// One cache level; construct with `CacheSim::new`.
pub use crate::cache::{AccessOutcome, CacheSim};
/// Per-cache and whole-hierarchy configuration.
pub use crate::config::{CacheConfig, HierarchyConfig, ReplacementPolicy};
/// Level registry and its entry ports.
pub use crate::hierarchy::{Hierarchy, NodeId, Ports};
/// Trace replay over a built hierarchy.
pub use crate::sim::{TraceReader, TraceRecord, TraceSimulator};
/// Statistics counters and sinks.
pub use crate::stats::{CacheStats, JsonReporter, StatsReporter, TextReporter};
