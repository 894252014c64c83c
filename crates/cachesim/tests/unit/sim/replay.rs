//! Trace Replay Tests.
//!
//! Verifies routing of records to the first-level caches and the replay summary.

use cachesim_core::common::{AccessKind, TraceError};
use cachesim_core::config::{CacheConfig, HierarchyConfig};
use cachesim_core::sim::{ReplaySummary, TraceReader, TraceRecord, TraceSimulator};
use pretty_assertions::assert_eq;

fn split_l1(with_icache: bool) -> TraceSimulator {
    TraceSimulator::from_config(&HierarchyConfig {
        icache: with_icache.then(|| CacheConfig::parse("16:2:64:L", "I$").unwrap()),
        dcache: Some(CacheConfig::parse("16:2:64:L", "D$").unwrap()),
        l2: Some(CacheConfig::parse("64:4:64:L", "L2$").unwrap()),
        log_misses: false,
    })
    .unwrap()
}

#[test]
fn fetches_and_data_take_separate_caches() {
    let mut sim = split_l1(true);
    let trace = "i 400\ni 404\nr 1000\nw 1000\n";
    let summary = sim.run(TraceReader::new(trace.as_bytes())).unwrap();

    assert_eq!(
        summary,
        ReplaySummary {
            records: 4,
            simulated: 4,
            unsimulated: 0,
        }
    );
    let ports = sim.ports();
    let hier = sim.hierarchy();
    let icache = hier.cache(ports.icache.unwrap()).unwrap().stats();
    let dcache = hier.cache(ports.dcache.unwrap()).unwrap().stats();
    assert_eq!((icache.read_accesses(), icache.read_misses()), (2, 1));
    assert_eq!((dcache.read_accesses(), dcache.write_accesses()), (1, 1));
    assert_eq!(dcache.misses(), 1);
    assert_eq!(hier.cache(ports.l2.unwrap()).unwrap().stats().accesses(), 2);
}

#[test]
fn records_without_l1_are_counted_not_simulated() {
    let mut sim = split_l1(false);
    let fetch = TraceRecord {
        kind: AccessKind::Fetch,
        addr: 0x400,
        bytes: 4,
    };
    assert!(!sim.step(&fetch).unwrap());
    let load = TraceRecord {
        kind: AccessKind::Load,
        ..fetch
    };
    assert!(sim.step(&load).unwrap());
    assert_eq!(sim.summary().unsimulated, 1);
    assert_eq!(sim.summary().simulated, 1);
}

#[test]
fn replay_stops_at_first_bad_record() {
    let mut sim = split_l1(true);
    let trace = "r 0\nr 40\nbad\nr 80\n";
    let err = sim.run(TraceReader::new(trace.as_bytes())).unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 3, .. }));
    assert_eq!(sim.summary().simulated, 2);
}

#[test]
fn released_hierarchy_keeps_state() {
    let mut sim = split_l1(true);
    sim.run(TraceReader::new("w 2000\n".as_bytes())).unwrap();
    let dcache = sim.ports().dcache.unwrap();
    let hier = sim.into_hierarchy();
    assert!(hier.cache(dcache).unwrap().is_dirty(0x2000));
}
