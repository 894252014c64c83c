//! Resident Line State.
//!
//! One `LineState` describes one way of one set. It starts empty, becomes valid on a
//! fill, and is only ever changed by the simulator: a hit may set the dirty flag or
//! refresh the policy stamp, and a victim selection overwrites it wholesale.

use crate::common::constants::{DIRTY, TAG_FLAGS, VALID};

/// Contents of one cache slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineState {
    /// Line tag (`addr >> offset_shift`).
    pub tag: u64,
    /// The slot holds a resident line.
    pub valid: bool,
    /// The line was written since it was filled.
    pub dirty: bool,
    /// Policy stamp: last-touch ordinal under LRU, fill ordinal under FIFO, unused under Random.
    pub stamp: u64,
}

impl LineState {
    /// A clean, valid line freshly installed with the given policy stamp.
    #[inline(always)]
    pub const fn filled(tag: u64, stamp: u64) -> Self {
        Self {
            tag,
            valid: true,
            dirty: false,
            stamp,
        }
    }

    /// Packs tag and flags into a single word, VALID and DIRTY in the top two bits.
    ///
    /// Requires the tag to leave bits 62 and 63 clear. Tags are addresses shifted
    /// right by at least three bits, so this always holds for a validated geometry.
    #[inline(always)]
    pub const fn raw(&self) -> u64 {
        debug_assert!(self.tag & TAG_FLAGS == 0);
        let mut word = self.tag;
        if self.valid {
            word |= VALID;
        }
        if self.dirty {
            word |= DIRTY;
        }
        word
    }

    /// An all-zero word marks a never-used slot.
    ///
    /// A valid line always carries the VALID bit, so this can only be true for a
    /// slot that has never been filled, including one whose line tag would be zero.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.raw() == 0
    }

    /// Whether this slot holds the line with `tag`.
    #[inline(always)]
    pub const fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    /// Evicting this line requires writing it back.
    #[inline(always)]
    pub const fn needs_writeback(&self) -> bool {
        self.valid && self.dirty
    }
}
