//! Hierarchy Forwarding Tests.
//!
//! Verifies what a level sends to the next one on a miss: line-sized, line-aligned
//! requests, with the writeback (and everything it triggers further down) completed
//! before the fill for the same miss.

use cachesim_core::hierarchy::{Hierarchy, MainMemory, MemoryTraffic};
use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::builder::{cache, named_cache, single_level};
use crate::common::mocks::{MockMemory, RecordingMemory, Request, requests};

// ══════════════════════════════════════════════════════════
// 1. Single Level
// ══════════════════════════════════════════════════════════

#[test]
fn fill_is_line_sized_and_aligned() {
    let mut level = single_level(cache("4:2:64:L"));
    level.hier.access(level.cache, 0x1234, 4, false).unwrap();
    assert_eq!(requests(&level.traffic), [Request::fill(0x1200, 64)]);
}

#[test]
fn hit_forwards_nothing() {
    let mut level = single_level(cache("4:2:64:L"));
    level.hier.access(level.cache, 0x100, 8, false).unwrap();
    level.hier.access(level.cache, 0x108, 8, true).unwrap();
    assert_eq!(requests(&level.traffic).len(), 1);
}

/// A dirty victim produces exactly one line-sized store, before the new fill.
#[test]
fn writeback_precedes_fill() {
    let mut level = single_level(cache("1:2:64:L"));
    level.hier.access(level.cache, 0x0, 8, true).unwrap();
    level.hier.access(level.cache, 0x40, 8, false).unwrap();
    level.hier.access(level.cache, 0x84, 8, false).unwrap();

    assert_eq!(
        requests(&level.traffic),
        [
            Request::fill(0x0, 64),
            Request::fill(0x40, 64),
            Request::writeback(0x0, 64),
            Request::fill(0x80, 64),
        ]
    );
    assert_eq!(level.hier.cache(level.cache).unwrap().stats().writebacks(), 1);
}

#[test]
fn mock_memory_sees_writeback_then_fill() {
    let mut seq = Sequence::new();
    let mut memory = MockMemory::new();
    memory
        .expect_access()
        .with(eq(0x0), eq(32), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    memory
        .expect_access()
        .with(eq(0x0), eq(32), eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    memory
        .expect_access()
        .with(eq(0x20), eq(32), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut hier = Hierarchy::new();
    let l1 = hier.add_cache(cache("1:1:32:L"));
    let mem = hier.add_memory(Box::new(memory));
    hier.link(l1, mem).unwrap();

    hier.access(l1, 0x8, 8, true).unwrap();
    hier.access(l1, 0x28, 8, false).unwrap();
}

/// Without a next level the miss is still counted; nothing else happens.
#[test]
fn unlinked_cache_is_terminal() {
    let mut hier = Hierarchy::new();
    let l1 = hier.add_cache(cache("1:1:64:L"));
    hier.access(l1, 0x0, 8, true).unwrap();
    hier.access(l1, 0x40, 8, false).unwrap();

    let stats = hier.cache(l1).unwrap().stats();
    assert_eq!(stats.misses(), 2);
    assert_eq!(stats.writebacks(), 1);
    assert_eq!(hier.next_level(l1).unwrap(), None);
}

// ══════════════════════════════════════════════════════════
// 2. Two Levels
// ══════════════════════════════════════════════════════════

#[test]
fn l2_sees_line_sized_fills_from_l1() {
    let mut hier = Hierarchy::new();
    let l1 = hier.add_cache(named_cache("4:2:32:L", "L1"));
    let l2 = hier.add_cache(named_cache("16:4:64:L", "L2"));
    let mem = hier.add_memory(Box::new(MainMemory::new()));
    hier.link(l1, l2).unwrap();
    hier.link(l2, mem).unwrap();

    hier.access(l1, 0x1000, 8, false).unwrap();
    hier.access(l1, 0x1020, 8, false).unwrap();

    let l2_stats = hier.cache(l2).unwrap().stats();
    assert_eq!(l2_stats.read_accesses(), 2);
    assert_eq!(l2_stats.bytes_read(), 64);
    // The second L1 line shares the first L2 line.
    assert_eq!(l2_stats.read_misses(), 1);
    assert_eq!(
        hier.main_memory(mem).unwrap().traffic(),
        MemoryTraffic {
            reads: 1,
            writes: 0,
            bytes_read: 64,
            bytes_written: 0,
        }
    );
}

/// The L1 writeback misses in L2 and triggers an L2 fill and eviction, all before
/// the L1 fill reaches L2.
#[test]
fn writeback_cascade_completes_before_fill() {
    let mut hier = Hierarchy::new();
    let l1 = hier.add_cache(named_cache("1:1:64:L", "L1"));
    let l2 = hier.add_cache(named_cache("1:1:64:L", "L2"));
    let (memory, traffic) = RecordingMemory::new();
    let mem = hier.add_memory(Box::new(memory));
    hier.link(l1, l2).unwrap();
    hier.link(l2, mem).unwrap();

    hier.access(l1, 0x0, 8, true).unwrap();
    // Displace 0x0 from L2 only, so the L1 writeback will miss there.
    hier.access(l2, 0x80, 8, false).unwrap();
    hier.access(l1, 0x40, 8, false).unwrap();

    assert_eq!(
        requests(&traffic),
        [
            Request::fill(0x0, 64),
            Request::fill(0x80, 64),
            // L1 writeback of 0x0 misses in L2 and allocates.
            Request::fill(0x0, 64),
            // L1 fill of 0x40 evicts the now-dirty 0x0 from L2.
            Request::writeback(0x0, 64),
            Request::fill(0x40, 64),
        ]
    );
    assert_eq!(hier.cache(l2).unwrap().stats().write_accesses(), 1);
}

#[test]
fn shared_l2_serves_both_l1s() {
    let mut hier = Hierarchy::new();
    let icache = hier.add_cache(named_cache("4:2:64:L", "I$"));
    let dcache = hier.add_cache(named_cache("4:2:64:L", "D$"));
    let l2 = hier.add_cache(named_cache("16:4:64:L", "L2$"));
    let mem = hier.add_memory(Box::new(MainMemory::new()));
    hier.link(icache, l2).unwrap();
    hier.link(dcache, l2).unwrap();
    hier.link(l2, mem).unwrap();

    hier.access(icache, 0x4000, 4, false).unwrap();
    hier.access(dcache, 0x4000, 8, false).unwrap();

    let l2_stats = hier.stats(l2).unwrap();
    assert_eq!(l2_stats.read_accesses(), 2);
    assert_eq!(l2_stats.read_misses(), 1);
    assert_eq!(hier.main_memory(mem).unwrap().traffic().reads, 1);
    assert!(hier.stats(mem).is_err());
}
