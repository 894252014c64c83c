//! Address Decomposition.
//!
//! This module splits a simulated byte address into the pieces a cache indexes by.
//! It provides the following:
//! 1. **Set Index:** `(addr >> shift) & (sets - 1)`, selecting the set an address maps to.
//! 2. **Line Tag:** `addr >> shift`, identifying the memory line independent of the set.
//! 3. **Reconstruction:** Recovering the line-aligned address of a resident line from its tag.
//!
//! The line tag deliberately keeps the set-index bits. Two lines that differ only in
//! their set index therefore never compare equal, and a victim's address can be rebuilt
//! from the tag alone.

/// Maps addresses to set indices and line tags for one cache geometry.
///
/// Both `sets` and the line size must be powers of two; the decoder is only built
/// from a validated [`CacheGeometry`](crate::config::CacheGeometry).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_shift: u32,
    set_mask: u64,
}

impl AddressDecoder {
    /// Creates a decoder for `sets` sets of `line_bytes`-byte lines.
    ///
    /// # Arguments
    ///
    /// * `sets` - Number of sets (power of two).
    /// * `line_bytes` - Line size in bytes (power of two).
    pub const fn new(sets: usize, line_bytes: usize) -> Self {
        Self {
            offset_shift: line_bytes.trailing_zeros(),
            set_mask: sets as u64 - 1,
        }
    }

    /// Returns the set index `addr` maps to.
    #[inline(always)]
    pub const fn index(&self, addr: u64) -> usize {
        ((addr >> self.offset_shift) & self.set_mask) as usize
    }

    /// Returns the line tag of `addr` (all bits above the line offset).
    #[inline(always)]
    pub const fn line_tag(&self, addr: u64) -> u64 {
        addr >> self.offset_shift
    }

    /// Returns `addr` rounded down to the start of its line.
    #[inline(always)]
    pub const fn line_base(&self, addr: u64) -> u64 {
        addr & !((1u64 << self.offset_shift) - 1)
    }

    /// Rebuilds the line-aligned address of a line from its tag.
    #[inline(always)]
    pub const fn line_addr(&self, line_tag: u64) -> u64 {
        line_tag << self.offset_shift
    }
}
