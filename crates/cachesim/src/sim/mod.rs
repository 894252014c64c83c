//! Trace replay.
//!
//! Provides the trace-record reader and the driver that replays records through a
//! cache hierarchy.

/// Trace-driven simulator over a built hierarchy.
pub mod simulator;

/// Memory trace record format and reader.
pub mod trace;

pub use simulator::{ReplaySummary, TraceSimulator};
pub use trace::{TraceReader, TraceRecord};
