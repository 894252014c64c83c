//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a cache hierarchy. It provides:
//! 1. **Geometry:** Validated `(sets, ways, line_bytes)` triples; only valid geometries can exist.
//! 2. **Policies:** The replacement policy selector, resolved once at construction.
//! 3. **Descriptors:** Parsing of the `sets:ways:blocksize[:policy]` command-line form.
//! 4. **Hierarchy:** A JSON document describing I-cache, D-cache and L2 levels.
//!
//! Configuration is supplied as descriptors on the command line or as a JSON file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::common::constants::{FULLY_ASSOCIATIVE_THRESHOLD, MIN_LINE_BYTES};

/// Default configuration values.
mod defaults {
    /// Display name used when a configuration does not carry one.
    pub const NAME: &str = "cache";

    /// Default set count.
    pub const SETS: usize = 64;

    /// Default associativity.
    pub const WAYS: usize = 4;

    /// Default line size in bytes.
    pub const LINE_BYTES: usize = 64;
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which cache line to evict
/// when a new line must be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum ReplacementPolicy {
    /// Random replacement driven by an LFSR.
    ///
    /// Overwrites a pseudo-randomly chosen way, empty or not.
    #[default]
    #[serde(alias = "RANDOM", alias = "random", alias = "R")]
    Random,
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the line whose last hit or fill is oldest.
    #[serde(alias = "LRU", alias = "lru", alias = "L")]
    Lru,
    /// First In First Out replacement policy.
    ///
    /// Evicts the line that was filled earliest; hits do not refresh it.
    #[serde(alias = "FIFO", alias = "fifo", alias = "F")]
    Fifo,
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "random" => Ok(Self::Random),
            "l" | "lru" => Ok(Self::Lru),
            "f" | "fifo" => Ok(Self::Fifo),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Lru => write!(f, "LRU"),
            Self::Fifo => write!(f, "FIFO"),
        }
    }
}

/// Validated cache geometry.
///
/// Invariants: `sets` is a nonzero power of two, `ways` is positive,
/// `line_bytes` is a power of two of at least 8, and the capacity in bytes fits a `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    sets: usize,
    ways: usize,
    line_bytes: usize,
}

impl CacheGeometry {
    /// Validates and builds a geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first field that violates the invariants.
    pub fn new(sets: usize, ways: usize, line_bytes: usize) -> Result<Self, ConfigError> {
        if !sets.is_power_of_two() {
            return Err(ConfigError::InvalidSets(sets));
        }
        if line_bytes < MIN_LINE_BYTES || !line_bytes.is_power_of_two() {
            return Err(ConfigError::InvalidLineSize(line_bytes));
        }
        if ways == 0 {
            return Err(ConfigError::InvalidWays(ways));
        }
        if sets
            .checked_mul(ways)
            .and_then(|lines| lines.checked_mul(line_bytes))
            .is_none()
        {
            return Err(ConfigError::GeometryTooLarge {
                sets,
                ways,
                line_bytes,
            });
        }
        Ok(Self {
            sets,
            ways,
            line_bytes,
        })
    }

    /// Number of sets.
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Number of ways per set.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.line_bytes
    }

    /// Total number of line slots (`sets * ways`).
    pub const fn lines(&self) -> usize {
        self.sets * self.ways
    }

    /// Total capacity in bytes.
    pub const fn size_bytes(&self) -> usize {
        self.lines() * self.line_bytes
    }

    /// Whether a cache with this geometry should use the tag-keyed store.
    ///
    /// True for a single set whose associativity exceeds the array-scan threshold.
    pub const fn is_fully_associative(&self) -> bool {
        self.sets == 1 && self.ways > FULLY_ASSOCIATIVE_THRESHOLD
    }
}

/// Configuration of one cache level.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, ReplacementPolicy};
///
/// let config = CacheConfig::parse("64:4:64:L", "D$").unwrap();
/// assert_eq!(config.sets, 64);
/// assert_eq!(config.policy, ReplacementPolicy::Lru);
/// assert_eq!(config.geometry().unwrap().size_bytes(), 16 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Display name used in reports and miss logs.
    #[serde(default = "CacheConfig::default_name")]
    pub name: String,

    /// Number of sets (power of two).
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity.
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Line size in bytes (power of two, at least 8).
    #[serde(default = "CacheConfig::default_line_bytes", alias = "blocksize")]
    pub line_bytes: usize,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,
}

impl CacheConfig {
    /// Returns the default display name.
    fn default_name() -> String {
        defaults::NAME.to_string()
    }

    /// Returns the default set count.
    const fn default_sets() -> usize {
        defaults::SETS
    }

    /// Returns the default associativity.
    const fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default line size.
    const fn default_line_bytes() -> usize {
        defaults::LINE_BYTES
    }

    /// Parses a `sets:ways:blocksize[:policy]` descriptor.
    ///
    /// The policy field accepts a single letter (`R`, `L`, `F`) or a full name and
    /// defaults to random replacement when omitted. The geometry is validated.
    ///
    /// # Arguments
    ///
    /// * `descriptor` - The descriptor string, e.g. `"64:4:64:L"`.
    /// * `name` - Display name for the cache, e.g. `"D$"`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedDescriptor`] when the descriptor does not have three
    /// or four numeric fields, [`ConfigError::UnknownPolicy`] for an unrecognised policy, or
    /// the geometry error for an invalid triple.
    pub fn parse(descriptor: &str, name: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedDescriptor(descriptor.to_string());
        let fields: Vec<&str> = descriptor.trim().split(':').collect();
        if !(3..=4).contains(&fields.len()) {
            return Err(malformed());
        }

        let number = |s: &str| s.trim().parse::<usize>().map_err(|_| malformed());
        let sets = number(fields[0])?;
        let ways = number(fields[1])?;
        let line_bytes = number(fields[2])?;
        let policy = match fields.get(3) {
            Some(p) if !p.trim().is_empty() => p.trim().parse()?,
            _ => ReplacementPolicy::default(),
        };

        let config = Self {
            name: name.to_string(),
            sets,
            ways,
            line_bytes,
            policy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the numeric fields and returns the geometry.
    ///
    /// # Errors
    ///
    /// See [`CacheGeometry::new`].
    pub fn geometry(&self) -> Result<CacheGeometry, ConfigError> {
        CacheGeometry::new(self.sets, self.ways, self.line_bytes)
    }

    /// Checks the geometry without keeping it.
    ///
    /// # Errors
    ///
    /// See [`CacheGeometry::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry().map(|_| ())
    }

    /// Whether [`CacheSim::new`](crate::cache::CacheSim::new) will pick the tag-keyed store.
    pub const fn is_fully_associative(&self) -> bool {
        self.sets == 1 && self.ways > FULLY_ASSOCIATIVE_THRESHOLD
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: defaults::NAME.to_string(),
            sets: defaults::SETS,
            ways: defaults::WAYS,
            line_bytes: defaults::LINE_BYTES,
            policy: ReplacementPolicy::default(),
        }
    }
}

/// A cache hierarchy: optional split L1 caches in front of an optional shared L2.
///
/// L1 caches forward to the L2 when one is configured, otherwise straight to
/// main memory. The L2 forwards to main memory.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::HierarchyConfig;
///
/// let json = r#"{
///     "dcache": { "name": "D$", "sets": 64, "ways": 4, "line_bytes": 64, "policy": "LRU" },
///     "l2": { "name": "L2$", "sets": 1, "ways": 16, "line_bytes": 64, "policy": "F" },
///     "log_misses": true
/// }"#;
///
/// let config = HierarchyConfig::from_json(json).unwrap();
/// assert!(config.icache.is_none());
/// assert!(config.l2.unwrap().geometry().unwrap().is_fully_associative());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HierarchyConfig {
    /// Level-1 instruction cache.
    #[serde(default)]
    pub icache: Option<CacheConfig>,

    /// Level-1 data cache.
    #[serde(default)]
    pub dcache: Option<CacheConfig>,

    /// Shared level-2 cache.
    #[serde(default)]
    pub l2: Option<CacheConfig>,

    /// Emit a diagnostic record for every miss.
    #[serde(default)]
    pub log_misses: bool,
}

impl HierarchyConfig {
    /// Parses and validates a JSON hierarchy document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for a malformed document, or the geometry
    /// error of the first invalid level.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON hierarchy document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`HierarchyConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks the geometry of every configured level.
    ///
    /// # Errors
    ///
    /// Returns the geometry error of the first invalid level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for level in self.levels() {
            level.validate()?;
        }
        Ok(())
    }

    /// Iterates over the configured levels, L1 caches first.
    pub fn levels(&self) -> impl Iterator<Item = &CacheConfig> {
        [&self.icache, &self.dcache, &self.l2]
            .into_iter()
            .filter_map(Option::as_ref)
    }
}
