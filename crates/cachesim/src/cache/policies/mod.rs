//! Cache Replacement Policies.
//!
//! Implements the algorithms that pick a victim slot on a miss. Every policy works
//! over the slots of one set (or the entries of a full fully-associative store),
//! presented in scan order.
//!
//! # Policies
//!
//! - `Random`: LFSR-driven way selection, no preference for empty slots.
//! - `Lru`: Least Recently Used, by last-touch stamp.
//! - `Fifo`: First-In, First-Out, by fill stamp.
//!
//! The LRU and FIFO clocks are owned by the policy instance, which is owned by
//! its simulator; nothing is shared between caches.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy and its pseudo-random source.
pub mod random;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use random::{Lfsr, RandomPolicy, RandomSource};

use super::line::LineState;
use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
///
/// Defines the hooks the simulator calls on every access, on hits, and when a
/// slot must be chosen for a new line.
pub trait ReplacementPolicy {
    /// Called once at the start of every access, hit or miss.
    fn begin_access(&mut self) {}

    /// Called when a lookup hits `line`.
    fn on_hit(&mut self, _line: &mut LineState) {}

    /// Selects the slot to overwrite.
    ///
    /// # Arguments
    ///
    /// * `lines` - The candidate slots in scan order. Never empty.
    ///
    /// # Returns
    ///
    /// The position of the victim within `lines`.
    fn choose_victim<'a, I>(&mut self, lines: I) -> usize
    where
        I: ExactSizeIterator<Item = &'a LineState>;

    /// Returns the stamp for a line being installed.
    fn fill_stamp(&mut self) -> u64 {
        0
    }
}

/// Picks the first never-used slot, or else the first slot with the smallest stamp.
///
/// Shared by LRU and FIFO, which differ only in how stamps are assigned.
pub(crate) fn oldest_or_empty<'a, I>(lines: I) -> usize
where
    I: Iterator<Item = &'a LineState>,
{
    let mut victim = 0;
    let mut oldest = u64::MAX;
    for (way, line) in lines.enumerate() {
        if line.is_empty() {
            return way;
        }
        if line.stamp < oldest {
            oldest = line.stamp;
            victim = way;
        }
    }
    victim
}

/// The replacement policy of one simulator, resolved once at construction.
#[derive(Debug)]
pub enum Policy {
    /// Random replacement.
    Random(RandomPolicy),
    /// Least Recently Used replacement.
    Lru(LruPolicy),
    /// First-In, First-Out replacement.
    Fifo(FifoPolicy),
}

impl Policy {
    /// Builds the policy state for `kind` with a default random source.
    pub fn new(kind: PolicyType) -> Self {
        match kind {
            PolicyType::Random => Self::Random(RandomPolicy::new(Box::new(Lfsr::default()))),
            PolicyType::Lru => Self::Lru(LruPolicy::new()),
            PolicyType::Fifo => Self::Fifo(FifoPolicy::new()),
        }
    }

    /// Returns which policy this is.
    pub const fn kind(&self) -> PolicyType {
        match self {
            Self::Random(_) => PolicyType::Random,
            Self::Lru(_) => PolicyType::Lru,
            Self::Fifo(_) => PolicyType::Fifo,
        }
    }

    /// Copies the policy clocks; a random policy restarts from a fresh default LFSR.
    pub(crate) fn duplicate(&self) -> Self {
        match self {
            Self::Random(_) => Self::new(PolicyType::Random),
            Self::Lru(p) => Self::Lru(p.clone()),
            Self::Fifo(p) => Self::Fifo(p.clone()),
        }
    }
}

impl ReplacementPolicy for Policy {
    #[inline(always)]
    fn begin_access(&mut self) {
        match self {
            Self::Random(p) => p.begin_access(),
            Self::Lru(p) => p.begin_access(),
            Self::Fifo(p) => p.begin_access(),
        }
    }

    #[inline(always)]
    fn on_hit(&mut self, line: &mut LineState) {
        match self {
            Self::Random(p) => p.on_hit(line),
            Self::Lru(p) => p.on_hit(line),
            Self::Fifo(p) => p.on_hit(line),
        }
    }

    #[inline(always)]
    fn choose_victim<'a, I>(&mut self, lines: I) -> usize
    where
        I: ExactSizeIterator<Item = &'a LineState>,
    {
        match self {
            Self::Random(p) => p.choose_victim(lines),
            Self::Lru(p) => p.choose_victim(lines),
            Self::Fifo(p) => p.choose_victim(lines),
        }
    }

    #[inline(always)]
    fn fill_stamp(&mut self) -> u64 {
        match self {
            Self::Random(p) => p.fill_stamp(),
            Self::Lru(p) => p.fill_stamp(),
            Self::Fifo(p) => p.fill_stamp(),
        }
    }
}
