//! Cache statistics collection and reporting.
//!
//! This module tracks the per-cache counters and hands them to reporters. It provides:
//! 1. **Counters:** Read/write accesses, read/write misses, bytes moved, and writebacks.
//! 2. **Derived metrics:** Hits, total misses, and miss rate.
//! 3. **Reporters:** Plain-text and JSON-lines sinks for final statistics.
//!
//! Counters only grow, and only `CacheSim::access` changes them.

use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;
use tracing::warn;

/// Per-cache access statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    read_accesses: u64,
    write_accesses: u64,
    read_misses: u64,
    write_misses: u64,
    bytes_read: u64,
    bytes_written: u64,
    pub(crate) writebacks: u64,
}

impl CacheStats {
    /// Counts one access of `bytes` bytes.
    #[inline(always)]
    pub(crate) const fn record_access(&mut self, bytes: usize, is_store: bool) {
        if is_store {
            self.write_accesses += 1;
            self.bytes_written += bytes as u64;
        } else {
            self.read_accesses += 1;
            self.bytes_read += bytes as u64;
        }
    }

    /// Counts one miss.
    #[inline(always)]
    pub(crate) const fn record_miss(&mut self, is_store: bool) {
        if is_store {
            self.write_misses += 1;
        } else {
            self.read_misses += 1;
        }
    }

    /// Number of read accesses.
    pub const fn read_accesses(&self) -> u64 {
        self.read_accesses
    }

    /// Number of write accesses.
    pub const fn write_accesses(&self) -> u64 {
        self.write_accesses
    }

    /// Number of read misses.
    pub const fn read_misses(&self) -> u64 {
        self.read_misses
    }

    /// Number of write misses.
    pub const fn write_misses(&self) -> u64 {
        self.write_misses
    }

    /// Bytes requested by reads.
    pub const fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Bytes supplied by writes.
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of dirty lines evicted.
    pub const fn writebacks(&self) -> u64 {
        self.writebacks
    }

    /// Total accesses.
    pub const fn accesses(&self) -> u64 {
        self.read_accesses + self.write_accesses
    }

    /// Total misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Total hits.
    pub const fn hits(&self) -> u64 {
        self.accesses() - self.misses()
    }

    /// Miss rate in percent, or 0.0 before the first access.
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            100.0 * self.misses() as f64 / total as f64
        }
    }

    /// Renders the counters as text, one line per counter prefixed with `name`.
    pub fn format_text(&self, name: &str) -> String {
        let rows = [
            ("Bytes Read:", self.bytes_read),
            ("Bytes Written:", self.bytes_written),
            ("Read Accesses:", self.read_accesses),
            ("Write Accesses:", self.write_accesses),
            ("Read Misses:", self.read_misses),
            ("Write Misses:", self.write_misses),
            ("Writebacks:", self.writebacks),
        ];
        let mut out = String::new();
        for (label, value) in rows {
            let _ = writeln!(out, "{name} {label:<23}{value}");
        }
        let _ = writeln!(out, "{name} {:<23}{:.3}%", "Miss Rate:", self.miss_rate());
        out
    }
}

/// Receives the final statistics of a cache.
pub trait StatsReporter: Send {
    /// Reports the statistics of the cache called `name`.
    fn report(&mut self, name: &str, stats: &CacheStats);
}

/// Writes statistics as text lines, skipping caches that saw no accesses.
#[derive(Debug)]
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write + Send> TextReporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TextReporter<std::io::Stdout> {
    /// Creates a reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> StatsReporter for TextReporter<W> {
    fn report(&mut self, name: &str, stats: &CacheStats) {
        if stats.accesses() == 0 {
            return;
        }
        if let Err(e) = self.out.write_all(stats.format_text(name).as_bytes()) {
            warn!(cache = name, error = %e, "failed to write statistics");
        }
    }
}

/// One JSON-lines record: the cache name, its counters, and the miss rate.
#[derive(Serialize)]
struct StatsRecord<'a> {
    name: &'a str,
    #[serde(flatten)]
    stats: &'a CacheStats,
    miss_rate: f64,
}

/// Writes one JSON object per cache, one per line.
#[derive(Debug)]
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write + Send> JsonReporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonReporter<std::io::Stdout> {
    /// Creates a reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> StatsReporter for JsonReporter<W> {
    fn report(&mut self, name: &str, stats: &CacheStats) {
        let record = StatsRecord {
            name,
            stats,
            miss_rate: stats.miss_rate(),
        };
        let written = serde_json::to_writer(&mut self.out, &record)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(e) = written {
            warn!(cache = name, error = %e, "failed to write statistics");
        }
    }
}
