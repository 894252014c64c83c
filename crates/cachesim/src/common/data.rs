//! Memory Access Types.
//!
//! This module defines the classification of memory accesses replayed through the
//! hierarchy. These types are used for the following:
//! 1. **Routing:** Sending instruction fetches to the I-cache and data accesses to the D-cache.
//! 2. **State Updates:** Deciding whether an access marks its line dirty.
//! 3. **Statistics Tracking:** Splitting counters into read and write buckets.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Instruction fetch. Treated as a read by the caches it reaches.
    Fetch,

    /// Data read.
    Load,

    /// Data write. Marks the target line dirty.
    Store,
}

impl AccessKind {
    /// Returns `true` for accesses that modify memory.
    #[inline(always)]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Load => write!(f, "read"),
            Self::Store => write!(f, "write"),
        }
    }
}
