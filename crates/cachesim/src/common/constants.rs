//! Global Simulator Constants.
//!
//! This module defines constants shared across the cache simulator. It includes:
//! 1. **Tag Flags:** The VALID and DIRTY bits packed into the high end of a stored tag word.
//! 2. **Geometry Limits:** Minimum line size and the fully-associative selection threshold.
//! 3. **Random Source:** Seed and tap mask of the default replacement LFSR.

/// Flag bit marking a stored tag word as holding a resident line.
pub const VALID: u64 = 1 << 63;

/// Flag bit marking a stored tag word as modified since it was filled.
pub const DIRTY: u64 = 1 << 62;

/// Mask covering both tag flag bits.
pub const TAG_FLAGS: u64 = VALID | DIRTY;

/// Smallest supported cache line size in bytes.
///
/// With lines of at least 8 bytes the offset shift is at least 3, so a line
/// tag (`addr >> shift`) never reaches the two flag bits above.
pub const MIN_LINE_BYTES: usize = 8;

/// Associativity above which a single-set cache uses the tag-keyed store.
///
/// Below this a linear scan over the ways is cheaper than a map lookup.
pub const FULLY_ASSOCIATIVE_THRESHOLD: usize = 4;

/// Initial register value of the replacement LFSR.
pub const LFSR_SEED: u32 = 1;

/// Feedback taps of the 32-bit Galois LFSR (x^32 + x^31 + x^29 + x + 1).
pub const LFSR_TAPS: u32 = 0xd000_0001;

/// Number of bytes assumed for a trace record that omits its size field.
pub const DEFAULT_ACCESS_BYTES: usize = 8;
