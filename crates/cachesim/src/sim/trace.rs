//! Memory Trace Records.
//!
//! This module reads memory-reference traces. It provides:
//! 1. **Record parsing:** `<kind> <addr> [<bytes>]`, where kind is `r`/`w`/`i` or the
//!    dinero labels `0`/`1`/`2`, addr is hexadecimal with an optional `0x`, and bytes is
//!    decimal (8 when omitted).
//! 2. **Streaming:** `TraceReader` iterates over records of any `BufRead` source, skipping
//!    blank lines and `#` comments and reporting errors with their line number.

use std::io::{BufRead, Lines};

use crate::common::constants::DEFAULT_ACCESS_BYTES;
use crate::common::{AccessKind, TraceError};

/// One memory reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Kind of access.
    pub kind: AccessKind,
    /// Byte address.
    pub addr: u64,
    /// Access size in bytes.
    pub bytes: usize,
}

impl TraceRecord {
    /// Parses one trace line.
    ///
    /// Returns `Ok(None)` for blank lines and comments.
    ///
    /// # Arguments
    ///
    /// * `text` - The line, without its terminator.
    /// * `line` - 1-based line number, used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::Malformed`] when the kind, address or size cannot be parsed,
    /// the size is zero, or the line has extra fields.
    pub fn parse(text: &str, line: usize) -> Result<Option<Self>, TraceError> {
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            return Ok(None);
        }
        let malformed = |reason: String| TraceError::Malformed { line, reason };

        let mut fields = text.split_whitespace();
        let kind = match fields.next() {
            Some("r" | "R" | "0") => AccessKind::Load,
            Some("w" | "W" | "1") => AccessKind::Store,
            Some("i" | "I" | "2") => AccessKind::Fetch,
            Some(other) => return Err(malformed(format!("unknown access kind '{other}'"))),
            None => return Ok(None),
        };

        let addr_text = fields
            .next()
            .ok_or_else(|| malformed("missing address".to_string()))?;
        let digits = addr_text
            .strip_prefix("0x")
            .or_else(|| addr_text.strip_prefix("0X"))
            .unwrap_or(addr_text);
        let addr = u64::from_str_radix(digits, 16)
            .map_err(|e| malformed(format!("bad address '{addr_text}': {e}")))?;

        let bytes = match fields.next() {
            Some(size) => size
                .parse::<usize>()
                .map_err(|e| malformed(format!("bad size '{size}': {e}")))?,
            None => DEFAULT_ACCESS_BYTES,
        };
        if bytes == 0 {
            return Err(malformed("access size must be positive".to_string()));
        }

        if let Some(extra) = fields.next() {
            return Err(malformed(format!("unexpected field '{extra}'")));
        }

        Ok(Some(Self { kind, addr, bytes }))
    }
}

/// Iterator over the records of a trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> TraceReader<R> {
    /// Creates a reader over `source`.
    pub fn new(source: R) -> Self {
        Self {
            lines: source.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match TraceRecord::parse(&text, self.line) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
