//! Tag Stores.
//!
//! This module holds the resident-line state of a cache. It provides two representations
//! with one interface:
//! 1. **Set-associative:** A flat `sets * ways` array scanned linearly within a set.
//! 2. **Fully-associative:** A tag-keyed ordered map holding at most `ways` lines, used
//!    when a single set has too many ways for a scan to be cheap.
//!
//! The representation is fixed at construction; [`TagStore`] dispatches with a `match`.

use std::collections::BTreeMap;

use super::line::LineState;
use super::policies::ReplacementPolicy;

/// Flat array of `sets * ways` slots, set `i` occupying `[i * ways, (i + 1) * ways)`.
#[derive(Clone, Debug)]
pub struct SetAssocStore {
    lines: Vec<LineState>,
    ways: usize,
}

impl SetAssocStore {
    /// Creates a store with every slot empty.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            lines: vec![LineState::default(); sets * ways],
            ways,
        }
    }

    /// The slots of set `index`, in way order.
    #[inline(always)]
    pub fn set(&self, index: usize) -> &[LineState] {
        let base = index * self.ways;
        &self.lines[base..base + self.ways]
    }

    #[inline(always)]
    fn set_mut(&mut self, index: usize) -> &mut [LineState] {
        let base = index * self.ways;
        &mut self.lines[base..base + self.ways]
    }

    /// Finds the slot of set `index` holding `tag`.
    #[inline(always)]
    pub fn find(&self, index: usize, tag: u64) -> Option<&LineState> {
        self.set(index).iter().find(|line| line.holds(tag))
    }

    /// Finds the slot of set `index` holding `tag`, mutably.
    #[inline(always)]
    pub fn find_mut(&mut self, index: usize, tag: u64) -> Option<&mut LineState> {
        self.set_mut(index).iter_mut().find(|line| line.holds(tag))
    }

    /// Installs `tag` into set `index` over the slot chosen by `policy`.
    ///
    /// Returns the slot's previous contents, which may be an empty slot.
    pub fn install<P: ReplacementPolicy>(&mut self, index: usize, tag: u64, policy: &mut P) -> LineState {
        let way = policy.choose_victim(self.set(index).iter());
        let stamp = policy.fill_stamp();
        std::mem::replace(&mut self.set_mut(index)[way], LineState::filled(tag, stamp))
    }

    /// Number of valid slots.
    pub fn resident(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }
}

/// Tag-keyed store for a single set with `capacity` ways.
///
/// Entries iterate in ascending tag order; the random and oldest-stamp victim
/// scans both walk that order.
#[derive(Clone, Debug)]
pub struct FullyAssocStore {
    lines: BTreeMap<u64, LineState>,
    capacity: usize,
}

impl FullyAssocStore {
    /// Creates an empty store holding at most `capacity` lines.
    pub const fn new(capacity: usize) -> Self {
        Self {
            lines: BTreeMap::new(),
            capacity,
        }
    }

    /// Finds the line with `tag`.
    #[inline(always)]
    pub fn find(&self, tag: u64) -> Option<&LineState> {
        self.lines.get(&tag)
    }

    /// Finds the line with `tag`, mutably.
    #[inline(always)]
    pub fn find_mut(&mut self, tag: u64) -> Option<&mut LineState> {
        self.lines.get_mut(&tag)
    }

    /// Installs `tag`, first evicting the entry chosen by `policy` when full.
    ///
    /// Returns the evicted line, or an empty slot when there was room.
    pub fn install<P: ReplacementPolicy>(&mut self, tag: u64, policy: &mut P) -> LineState {
        let mut victim = LineState::default();
        if self.lines.len() >= self.capacity {
            let position = policy.choose_victim(self.lines.values());
            if let Some(key) = self.lines.keys().nth(position).copied() {
                if let Some(evicted) = self.lines.remove(&key) {
                    victim = evicted;
                }
            }
        }
        let stamp = policy.fill_stamp();
        let _ = self.lines.insert(tag, LineState::filled(tag, stamp));
        victim
    }

    /// Number of resident lines.
    pub fn resident(&self) -> usize {
        self.lines.len()
    }
}

/// Resident-line storage of one cache, in one of two fixed representations.
#[derive(Clone, Debug)]
pub enum TagStore {
    /// Flat array, linear scan per set.
    SetAssociative(SetAssocStore),
    /// Tag-keyed map, single set.
    FullyAssociative(FullyAssocStore),
}

impl TagStore {
    /// Looks up the line `tag` in set `index` without side effects.
    #[inline(always)]
    pub fn peek(&self, index: usize, tag: u64) -> Option<&LineState> {
        match self {
            Self::SetAssociative(store) => store.find(index, tag),
            Self::FullyAssociative(store) => store.find(tag),
        }
    }

    /// Looks up the line `tag` in set `index` for modification.
    #[inline(always)]
    pub fn lookup(&mut self, index: usize, tag: u64) -> Option<&mut LineState> {
        match self {
            Self::SetAssociative(store) => store.find_mut(index, tag),
            Self::FullyAssociative(store) => store.find_mut(tag),
        }
    }

    /// Installs line `tag` into set `index`, returning the previous slot contents.
    #[inline(always)]
    pub fn install<P: ReplacementPolicy>(&mut self, index: usize, tag: u64, policy: &mut P) -> LineState {
        match self {
            Self::SetAssociative(store) => store.install(index, tag, policy),
            Self::FullyAssociative(store) => store.install(tag, policy),
        }
    }

    /// Number of resident lines.
    pub fn resident(&self) -> usize {
        match self {
            Self::SetAssociative(store) => store.resident(),
            Self::FullyAssociative(store) => store.resident(),
        }
    }

    /// Whether this is the tag-keyed representation.
    pub const fn is_fully_associative(&self) -> bool {
        matches!(self, Self::FullyAssociative(_))
    }
}
