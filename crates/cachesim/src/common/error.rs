//! Error Definitions.
//!
//! This module defines every recoverable error the simulator library reports. It provides:
//! 1. **Configuration Errors:** Invalid cache geometry, malformed descriptors, unreadable config files.
//! 2. **Hierarchy Errors:** Bad node ids and illegal links between levels.
//! 3. **Trace Errors:** Malformed trace records, I/O failures, and misrouted records while replaying.
//!
//! A simulated access itself never fails: hits and misses are ordinary outcomes, and a
//! cache without a next level is a valid terminal configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::hierarchy::NodeId;

/// Explanation printed alongside any configuration error.
pub const CONFIG_USAGE: &str = "Cache configurations must be of the form\n  \
     sets:ways:blocksize[:policy]\n\
     where sets, ways, and blocksize are positive integers, with\n\
     sets and blocksize both powers of two and blocksize at least 8.\n\
     policy is one of R (random), L (LRU) or F (FIFO); random if omitted.";

/// Invalid cache configuration.
///
/// The library reports these to the caller; the command-line front end treats
/// every variant as fatal and exits after printing [`CONFIG_USAGE`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The set count is zero or not a power of two.
    #[error("sets must be a nonzero power of two (got {0})")]
    InvalidSets(usize),

    /// The line size is below 8 bytes or not a power of two.
    #[error("blocksize must be a power of two of at least 8 bytes (got {0})")]
    InvalidLineSize(usize),

    /// The associativity is zero.
    #[error("ways must be a positive integer (got {0})")]
    InvalidWays(usize),

    /// The total capacity `sets * ways * blocksize` does not fit in memory.
    #[error("cache of {sets} sets x {ways} ways x {line_bytes} bytes is too large")]
    GeometryTooLarge {
        /// Requested set count.
        sets: usize,
        /// Requested associativity.
        ways: usize,
        /// Requested line size.
        line_bytes: usize,
    },

    /// A `sets:ways:blocksize[:policy]` descriptor could not be split or parsed.
    #[error("malformed cache descriptor '{0}'")]
    MalformedDescriptor(String),

    /// The replacement policy name is not recognised.
    #[error("unknown replacement policy '{0}'")]
    UnknownPolicy(String),

    /// A hierarchy configuration file could not be read.
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A hierarchy configuration document is not valid JSON for the schema.
    #[error("invalid hierarchy configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured levels could not be linked into a hierarchy.
    #[error("invalid hierarchy wiring: {0}")]
    Wiring(#[from] HierarchyError),
}

/// Illegal operation on a [`Hierarchy`](crate::hierarchy::Hierarchy).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    /// The id does not name a node of this hierarchy.
    #[error("no node {0} in this hierarchy")]
    UnknownNode(NodeId),

    /// The node is terminal memory, which has no next level.
    #[error("node {0} is not a cache")]
    NotACache(NodeId),

    /// The cache already has a next level; links are established once.
    #[error("cache node {0} is already linked")]
    AlreadyLinked(NodeId),

    /// The link would make a level forward into itself.
    #[error("linking {from} to {to} would create a cycle")]
    Cycle {
        /// Cache being linked.
        from: NodeId,
        /// Proposed next level.
        to: NodeId,
    },
}

/// Failure while reading a memory trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line does not follow the `<kind> <addr> [<bytes>]` record format.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number within the trace.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },

    /// The trace source could not be read.
    #[error("trace read failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record was routed to a node the hierarchy does not have.
    #[error("trace replay failed: {0}")]
    Hierarchy(#[from] HierarchyError),
}
