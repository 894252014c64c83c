//! Hierarchy construction from configuration.
//!
//! This module builds a complete hierarchy from a [`HierarchyConfig`]. It performs:
//! 1. **Level creation:** Instantiates the I-cache, D-cache and L2 that are configured.
//! 2. **Terminal memory:** Adds a [`MainMemory`] at the end of every chain.
//! 3. **Wiring:** Links the L1 caches to the L2 when present, else to memory; the L2 to memory.
//! 4. **Routing:** Returns [`Ports`] telling the caller where fetches and data accesses enter.

use super::{Hierarchy, MainMemory, NodeId};
use crate::cache::CacheSim;
use crate::common::{AccessKind, ConfigError};
use crate::config::HierarchyConfig;

/// Entry points of a built hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ports {
    /// Level-1 instruction cache.
    pub icache: Option<NodeId>,
    /// Level-1 data cache.
    pub dcache: Option<NodeId>,
    /// Shared level-2 cache.
    pub l2: Option<NodeId>,
    /// Terminal main memory.
    pub memory: NodeId,
}

impl Ports {
    /// Returns the first-level cache an access of `kind` enters, if one is configured.
    pub const fn route(&self, kind: AccessKind) -> Option<NodeId> {
        match kind {
            AccessKind::Fetch => self.icache,
            AccessKind::Load | AccessKind::Store => self.dcache,
        }
    }
}

impl Hierarchy {
    /// Builds the hierarchy described by `config`.
    ///
    /// Caches are added in the order I-cache, D-cache, L2, so reports come out in that
    /// order too. Miss logging is applied to every level when the config asks for it.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first level with an invalid geometry.
    pub fn from_config(config: &HierarchyConfig) -> Result<(Self, Ports), ConfigError> {
        let mut hier = Self::new();

        let icache = config
            .icache
            .as_ref()
            .map(|c| CacheSim::new(c).map(|sim| hier.add_cache(sim)))
            .transpose()?;
        let dcache = config
            .dcache
            .as_ref()
            .map(|c| CacheSim::new(c).map(|sim| hier.add_cache(sim)))
            .transpose()?;
        let l2 = config
            .l2
            .as_ref()
            .map(|c| CacheSim::new(c).map(|sim| hier.add_cache(sim)))
            .transpose()?;
        let memory = hier.add_memory(Box::new(MainMemory::new()));

        let below_l1 = l2.unwrap_or(memory);
        for l1 in [icache, dcache].into_iter().flatten() {
            hier.link(l1, below_l1)?;
        }
        if let Some(l2) = l2 {
            hier.link(l2, memory)?;
        }

        hier.set_log_misses(config.log_misses);
        Ok((
            hier,
            Ports {
                icache,
                dcache,
                l2,
                memory,
            },
        ))
    }
}
