//! Cache Simulator.
//!
//! This module implements the occupancy and replacement model of one cache level.
//! For every access it decodes the address, searches the tag store, and on a miss picks
//! a victim with the configured replacement policy. Misses produce a fill request and,
//! for dirty victims, a writeback request; the [`Hierarchy`](crate::hierarchy::Hierarchy)
//! forwards both to the next level.
//!
//! Timing, coherence between sibling caches, and address translation are not modelled.

/// Per-slot resident line record.
pub mod line;

/// Cache replacement policy implementations (Random, LRU, FIFO).
pub mod policies;

/// Set-associative and fully-associative tag stores.
pub mod store;

use std::fmt;

use tracing::{debug, trace};

use self::line::LineState;
use self::policies::{Policy, RandomPolicy, RandomSource, ReplacementPolicy};
use self::store::{FullyAssocStore, SetAssocStore, TagStore};
use crate::common::{AddressDecoder, ConfigError};
use crate::config::{CacheConfig, CacheGeometry, ReplacementPolicy as PolicyType};
use crate::hierarchy::MemoryHandler;
use crate::stats::{CacheStats, StatsReporter};

/// Result of one access, telling the caller what to forward to the next level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The line was resident.
    Hit,
    /// The line was not resident and has now been installed.
    Miss {
        /// Line-aligned address of a dirty victim that must be written back first.
        writeback: Option<u64>,
        /// Line-aligned address to fetch from the next level.
        fill: u64,
    },
}

impl AccessOutcome {
    /// Returns `true` for a hit.
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Cache simulator for one level of the hierarchy.
///
/// Construct with [`CacheSim::new`], which picks the tag-keyed store for single-set
/// caches with many ways and the flat array otherwise. The choice is fixed for the
/// lifetime of the simulator.
///
/// Dropping a simulator hands its statistics to the attached [`StatsReporter`], if any.
/// Dirty lines still resident at that point are discarded without a writeback.
pub struct CacheSim {
    name: String,
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    store: TagStore,
    policy: Policy,
    stats: CacheStats,
    log_misses: bool,
    reporter: Option<Box<dyn StatsReporter>>,
}

impl CacheSim {
    /// Creates a cache simulator from a configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Name, geometry and replacement policy of the cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the geometry is invalid: sets not a power of two,
    /// line size not a power of two or below 8 bytes, or zero ways.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        let store = if geometry.is_fully_associative() {
            TagStore::FullyAssociative(FullyAssocStore::new(geometry.ways()))
        } else {
            TagStore::SetAssociative(SetAssocStore::new(geometry.sets(), geometry.ways()))
        };
        Ok(Self::with_store(&config.name, geometry, store, config.policy))
    }

    /// Creates a simulator that always uses the flat set-associative store.
    pub fn set_associative(name: &str, geometry: CacheGeometry, policy: PolicyType) -> Self {
        let store = TagStore::SetAssociative(SetAssocStore::new(geometry.sets(), geometry.ways()));
        Self::with_store(name, geometry, store, policy)
    }

    /// Creates a single-set simulator that always uses the tag-keyed store.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for zero ways or an invalid line size.
    pub fn fully_associative(
        name: &str,
        ways: usize,
        line_bytes: usize,
        policy: PolicyType,
    ) -> Result<Self, ConfigError> {
        let geometry = CacheGeometry::new(1, ways, line_bytes)?;
        let store = TagStore::FullyAssociative(FullyAssocStore::new(ways));
        Ok(Self::with_store(name, geometry, store, policy))
    }

    fn with_store(name: &str, geometry: CacheGeometry, store: TagStore, policy: PolicyType) -> Self {
        trace!(
            cache = name,
            sets = geometry.sets(),
            ways = geometry.ways(),
            line_bytes = geometry.line_bytes(),
            fully_associative = store.is_fully_associative(),
            %policy,
            "cache constructed"
        );
        Self {
            name: name.to_string(),
            geometry,
            decoder: AddressDecoder::new(geometry.sets(), geometry.line_bytes()),
            store,
            policy: Policy::new(policy),
            stats: CacheStats::default(),
            log_misses: false,
            reporter: None,
        }
    }

    /// Replaces the random-replacement source. Has no effect on LRU or FIFO caches.
    #[must_use]
    pub fn with_random_source(mut self, source: Box<dyn RandomSource>) -> Self {
        if let Policy::Random(_) = self.policy {
            self.policy = Policy::Random(RandomPolicy::new(source));
        }
        self
    }

    /// Simulates one memory access.
    ///
    /// On a hit, a store marks the line dirty and LRU refreshes its stamp. On a miss,
    /// the policy's victim is overwritten with the new line; a store leaves it dirty.
    /// The returned outcome carries the writeback (for a dirty victim) and fill
    /// addresses the caller forwards to the next level, writeback first.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address of the access.
    /// * `bytes` - Access size, counted in the byte statistics.
    /// * `is_store` - Whether the access writes memory.
    ///
    /// # Panics
    ///
    /// Panics if the line just installed cannot be found again, which would be a
    /// defect in the tag store rather than a property of the access.
    pub fn access(&mut self, addr: u64, bytes: usize, is_store: bool) -> AccessOutcome {
        self.policy.begin_access();
        self.stats.record_access(bytes, is_store);

        let index = self.decoder.index(addr);
        let tag = self.decoder.line_tag(addr);

        if let Some(line) = self.store.lookup(index, tag) {
            self.policy.on_hit(line);
            if is_store {
                line.dirty = true;
            }
            return AccessOutcome::Hit;
        }

        self.stats.record_miss(is_store);
        if self.log_misses {
            debug!(
                target: "cachesim::miss",
                cache = %self.name,
                kind = if is_store { "write" } else { "read" },
                addr = %format_args!("{addr:#x}"),
                "miss"
            );
        }

        let victim = self.store.install(index, tag, &mut self.policy);
        let writeback = if victim.needs_writeback() {
            self.stats.writebacks += 1;
            Some(self.decoder.line_addr(victim.tag))
        } else {
            None
        };

        if is_store {
            match self.store.lookup(index, tag) {
                Some(line) => line.dirty = true,
                None => unreachable!("{}: line {tag:#x} missing right after install", self.name),
            }
        }

        AccessOutcome::Miss {
            writeback,
            fill: self.decoder.line_base(addr),
        }
    }

    /// Checks whether the line holding `addr` is resident, without touching policy state.
    pub fn contains(&self, addr: u64) -> bool {
        self.resident(addr).is_some()
    }

    /// Checks whether the line holding `addr` is resident and dirty.
    pub fn is_dirty(&self, addr: u64) -> bool {
        self.resident(addr).is_some_and(|line| line.dirty)
    }

    fn resident(&self, addr: u64) -> Option<&LineState> {
        self.store
            .peek(self.decoder.index(addr), self.decoder.line_tag(addr))
    }

    /// Returns an independent copy of this cache.
    ///
    /// The copy keeps the resident lines and the LRU/FIFO clocks. Its statistics start
    /// at zero, a random policy restarts from the default LFSR, miss logging is off,
    /// and no reporter is attached. It belongs to no hierarchy until added to one.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            name: self.name.clone(),
            geometry: self.geometry,
            decoder: self.decoder,
            store: self.store.clone(),
            policy: self.policy.duplicate(),
            stats: CacheStats::default(),
            log_misses: false,
            reporter: None,
        }
    }

    /// Enables or disables the per-miss diagnostic record.
    pub fn set_log_misses(&mut self, enabled: bool) {
        self.log_misses = enabled;
    }

    /// Attaches the reporter that receives the final statistics on drop.
    pub fn set_reporter(&mut self, reporter: Box<dyn StatsReporter>) {
        self.reporter = Some(reporter);
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cache geometry.
    pub const fn geometry(&self) -> CacheGeometry {
        self.geometry
    }

    /// Replacement policy in use.
    pub const fn policy(&self) -> PolicyType {
        self.policy.kind()
    }

    /// Whether the tag-keyed store is in use.
    pub const fn is_fully_associative(&self) -> bool {
        self.store.is_fully_associative()
    }

    /// Number of resident lines.
    pub fn resident_lines(&self) -> usize {
        self.store.resident()
    }

    /// Statistics accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl MemoryHandler for CacheSim {
    /// Runs the access on this cache alone; nothing is forwarded.
    fn access(&mut self, addr: u64, bytes: usize, is_store: bool) {
        // Inherent `CacheSim::access` takes precedence over this trait method.
        let _ = Self::access(self, addr, bytes, is_store);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CacheSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSim")
            .field("name", &self.name)
            .field("geometry", &self.geometry)
            .field("policy", &self.policy.kind())
            .field("fully_associative", &self.store.is_fully_associative())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Drop for CacheSim {
    fn drop(&mut self) {
        if let Some(mut reporter) = self.reporter.take() {
            reporter.report(&self.name, &self.stats);
        }
    }
}
