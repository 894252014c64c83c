//! Cache Hierarchy.
//!
//! This module composes cache levels into chains and trees. It provides:
//! 1. **Registry:** `Hierarchy` owns every level and terminal memory; levels refer to each
//!    other only by `NodeId`, so no level owns or borrows another.
//! 2. **Links:** Each cache has at most one next level, set once after construction.
//! 3. **Forwarding:** Misses are forwarded synchronously and depth first; a writeback is
//!    fully handled, including its own eviction cascade, before the fill for the same miss.
//! 4. **Builder:** Assembly of the I-cache / D-cache / L2 / memory topology from configuration.

/// Hierarchy assembly from a `HierarchyConfig`.
pub mod builder;

/// Terminal main memory model.
pub mod memory;

/// Memory handler trait definitions.
pub mod traits;

use std::fmt;

use tracing::trace;

pub use builder::Ports;
pub use memory::{MainMemory, MemoryTraffic};
pub use traits::MemoryHandler;

use crate::cache::{AccessOutcome, CacheSim};
use crate::common::HierarchyError;
use crate::stats::{CacheStats, StatsReporter};

/// Handle of a node within one [`Hierarchy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

enum Node {
    Cache {
        sim: CacheSim,
        next: Option<NodeId>,
    },
    Terminal(Box<dyn MemoryHandler>),
}

/// Owner of all levels of a cache hierarchy and the links between them.
///
/// # Examples
///
/// ```
/// use cachesim_core::cache::CacheSim;
/// use cachesim_core::config::CacheConfig;
/// use cachesim_core::hierarchy::{Hierarchy, MainMemory};
///
/// let mut hier = Hierarchy::new();
/// let l1 = hier.add_cache(CacheSim::new(&CacheConfig::parse("64:2:64:L", "L1").unwrap()).unwrap());
/// let l2 = hier.add_cache(CacheSim::new(&CacheConfig::parse("256:8:64:L", "L2").unwrap()).unwrap());
/// let mem = hier.add_memory(Box::new(MainMemory::new()));
/// hier.link(l1, l2).unwrap();
/// hier.link(l2, mem).unwrap();
///
/// hier.access(l1, 0x8000_0000, 8, false).unwrap();
/// assert_eq!(hier.cache(l2).unwrap().stats().read_accesses(), 1);
/// assert_eq!(hier.main_memory(mem).unwrap().traffic().reads, 1);
/// ```
#[derive(Default)]
pub struct Hierarchy {
    nodes: Vec<Node>,
}

impl Hierarchy {
    /// Creates an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cache level, initially without a next level.
    pub fn add_cache(&mut self, sim: CacheSim) -> NodeId {
        self.nodes.push(Node::Cache { sim, next: None });
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a terminal memory model.
    pub fn add_memory(&mut self, handler: Box<dyn MemoryHandler>) -> NodeId {
        self.nodes.push(Node::Terminal(handler));
        NodeId(self.nodes.len() - 1)
    }

    /// Makes `to` the next level of cache `from`.
    ///
    /// # Errors
    ///
    /// Fails if either id is unknown, `from` is terminal memory, `from` already has a
    /// next level, or the link would let an access reach `from` again.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> Result<(), HierarchyError> {
        let _ = self.node(to)?;
        match self.node(from)? {
            Node::Terminal(_) => return Err(HierarchyError::NotACache(from)),
            Node::Cache { next: Some(_), .. } => return Err(HierarchyError::AlreadyLinked(from)),
            Node::Cache { next: None, .. } => {}
        }

        let mut cursor = Some(to);
        while let Some(id) = cursor {
            if id == from {
                return Err(HierarchyError::Cycle { from, to });
            }
            cursor = match &self.nodes[id.0] {
                Node::Cache { next, .. } => *next,
                Node::Terminal(_) => None,
            };
        }

        if let Node::Cache { next, .. } = &mut self.nodes[from.0] {
            *next = Some(to);
        }
        trace!(%from, %to, "hierarchy link");
        Ok(())
    }

    /// Returns the next level of cache `id`, if linked.
    ///
    /// # Errors
    ///
    /// Fails if `id` is unknown or names terminal memory.
    pub fn next_level(&self, id: NodeId) -> Result<Option<NodeId>, HierarchyError> {
        match self.node(id)? {
            Node::Cache { next, .. } => Ok(*next),
            Node::Terminal(_) => Err(HierarchyError::NotACache(id)),
        }
    }

    /// Sends one access to node `id` and forwards whatever it misses on.
    ///
    /// # Errors
    ///
    /// Fails only if `id` is unknown; the access itself always completes.
    pub fn access(
        &mut self,
        id: NodeId,
        addr: u64,
        bytes: usize,
        is_store: bool,
    ) -> Result<(), HierarchyError> {
        let _ = self.node(id)?;
        self.dispatch(id, addr, bytes, is_store);
        Ok(())
    }

    /// Runs an access on a node already known to exist. Links only point at
    /// existing nodes, so the recursion stays in bounds.
    fn dispatch(&mut self, id: NodeId, addr: u64, bytes: usize, is_store: bool) {
        let (outcome, next, line_bytes) = match &mut self.nodes[id.0] {
            Node::Cache { sim, next } => (
                sim.access(addr, bytes, is_store),
                *next,
                sim.geometry().line_bytes(),
            ),
            Node::Terminal(handler) => {
                handler.access(addr, bytes, is_store);
                return;
            }
        };

        if let (AccessOutcome::Miss { writeback, fill }, Some(next)) = (outcome, next) {
            if let Some(victim) = writeback {
                self.dispatch(next, victim, line_bytes, true);
            }
            self.dispatch(next, fill, line_bytes, false);
        }
    }

    /// Returns the cache at `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` is unknown or names terminal memory.
    pub fn cache(&self, id: NodeId) -> Result<&CacheSim, HierarchyError> {
        match self.node(id)? {
            Node::Cache { sim, .. } => Ok(sim),
            Node::Terminal(_) => Err(HierarchyError::NotACache(id)),
        }
    }

    /// Returns the statistics of the cache at `id`.
    ///
    /// # Errors
    ///
    /// Fails if `id` is unknown or names terminal memory.
    pub fn stats(&self, id: NodeId) -> Result<&CacheStats, HierarchyError> {
        self.cache(id).map(CacheSim::stats)
    }

    /// Returns the cache at `id` for reconfiguration (logging, reporter).
    ///
    /// # Errors
    ///
    /// Fails if `id` is unknown or names terminal memory.
    pub fn cache_mut(&mut self, id: NodeId) -> Result<&mut CacheSim, HierarchyError> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Cache { sim, .. }) => Ok(sim),
            Some(Node::Terminal(_)) => Err(HierarchyError::NotACache(id)),
            None => Err(HierarchyError::UnknownNode(id)),
        }
    }

    /// Returns the terminal memory at `id` when it is a [`MainMemory`].
    pub fn main_memory(&self, id: NodeId) -> Option<&MainMemory> {
        match self.nodes.get(id.0) {
            Some(Node::Terminal(handler)) => handler.as_main_memory(),
            _ => None,
        }
    }

    /// Iterates over all cache levels in insertion order.
    pub fn caches(&self) -> impl Iterator<Item = (NodeId, &CacheSim)> {
        self.nodes.iter().enumerate().filter_map(|(i, node)| match node {
            Node::Cache { sim, .. } => Some((NodeId(i), sim)),
            Node::Terminal(_) => None,
        })
    }

    /// Turns per-miss logging on or off for every cache level.
    pub fn set_log_misses(&mut self, enabled: bool) {
        for node in &mut self.nodes {
            if let Node::Cache { sim, .. } = node {
                sim.set_log_misses(enabled);
            }
        }
    }

    /// Sends the current statistics of every cache to `reporter`, in insertion order.
    pub fn report(&self, reporter: &mut dyn StatsReporter) {
        for (_, sim) in self.caches() {
            reporter.report(sim.name(), sim.stats());
        }
    }

    /// Number of nodes, caches and memories together.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> Result<&Node, HierarchyError> {
        self.nodes.get(id.0).ok_or(HierarchyError::UnknownNode(id))
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Cache { sim, next } => {
                    let _ = list.entry(&(NodeId(i), sim.name(), next));
                }
                Node::Terminal(handler) => {
                    let _ = list.entry(&(NodeId(i), handler.name()));
                }
            }
        }
        list.finish()
    }
}
