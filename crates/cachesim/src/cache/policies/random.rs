//! Random Replacement Policy.
//!
//! This policy overwrites a pseudo-randomly chosen way. Like a hardware LFSR-based
//! replacement unit it never looks for an empty slot first. Numbers come from a
//! [`RandomSource`], by default a 32-bit Galois LFSR.

use std::fmt;

use super::ReplacementPolicy;
use crate::cache::line::LineState;
use crate::common::constants::{LFSR_SEED, LFSR_TAPS};

/// A stream of pseudo-random integers driving random replacement.
///
/// Each simulator owns its source exclusively.
pub trait RandomSource: Send {
    /// Advances the source and returns the next value.
    fn next_u32(&mut self) -> u32;
}

/// 32-bit Galois linear feedback shift register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lfsr {
    reg: u32,
}

impl Lfsr {
    /// Creates an LFSR with the given nonzero seed.
    pub const fn with_seed(seed: u32) -> Self {
        Self { reg: seed }
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::with_seed(LFSR_SEED)
    }
}

impl RandomSource for Lfsr {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        let feedback = (self.reg & 1).wrapping_neg() & LFSR_TAPS;
        self.reg = (self.reg >> 1) ^ feedback;
        self.reg
    }
}

/// Random Policy state.
pub struct RandomPolicy {
    source: Box<dyn RandomSource>,
}

impl RandomPolicy {
    /// Creates a random policy drawing from `source`.
    pub fn new(source: Box<dyn RandomSource>) -> Self {
        Self { source }
    }
}

impl fmt::Debug for RandomPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomPolicy").finish_non_exhaustive()
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Draws `next % len`; the slot's current contents play no part.
    fn choose_victim<'a, I>(&mut self, lines: I) -> usize
    where
        I: ExactSizeIterator<Item = &'a LineState>,
    {
        self.source.next_u32() as usize % lines.len()
    }
}
