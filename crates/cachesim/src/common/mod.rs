//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every cache level. It includes:
//! 1. **Address Decoding:** Set index and line tag extraction for a given geometry.
//! 2. **Constants:** Tag flag bits, geometry limits, and LFSR parameters.
//! 3. **Memory Access:** Classification of replayed accesses (Fetch/Load/Store).
//! 4. **Error Handling:** Configuration, hierarchy, and trace error types.

/// Address decomposition into set index and line tag.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::AddressDecoder;
pub use data::AccessKind;
pub use error::{CONFIG_USAGE, ConfigError, HierarchyError, TraceError};
