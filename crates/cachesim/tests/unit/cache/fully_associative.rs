//! Fully-Associative Store Tests.
//!
//! A single-set cache can be backed by the tag-keyed map or by the flat array.
//! For LRU and FIFO both must make the same decisions on any trace.

use cachesim_core::cache::CacheSim;
use cachesim_core::config::{CacheGeometry, ReplacementPolicy};
use proptest::prelude::*;

use crate::common::builder::cache;

#[test]
fn many_way_single_set_uses_tag_store() {
    assert!(cache("1:8:64:L").is_fully_associative());
    assert!(!cache("1:4:64:L").is_fully_associative());
    assert!(!cache("2:8:64:L").is_fully_associative());
}

#[test]
fn fills_up_to_capacity_before_evicting() {
    let mut cache = cache("1:8:64:F");
    for i in 0..8u64 {
        assert!(!cache.access(i * 0x40, 8, false).is_hit());
    }
    assert_eq!(cache.resident_lines(), 8);
    assert_eq!(cache.stats().writebacks(), 0);

    cache.access(8 * 0x40, 8, false);
    assert_eq!(cache.resident_lines(), 8);
    assert!(!cache.contains(0x0));
}

#[test]
fn dirty_victim_reports_writeback_address() {
    let mut cache = cache("1:8:64:L");
    cache.access(0x7000, 8, true);
    for i in 1..8u64 {
        cache.access(i * 0x40, 8, false);
    }
    let outcome = cache.access(0x9000, 8, false);
    assert_eq!(
        outcome,
        cachesim_core::cache::AccessOutcome::Miss {
            writeback: Some(0x7000),
            fill: 0x9000,
        }
    );
}

fn pair(ways: usize, policy: ReplacementPolicy) -> (CacheSim, CacheSim) {
    let geometry = CacheGeometry::new(1, ways, 64).unwrap();
    let array = CacheSim::set_associative("array", geometry, policy);
    let map = CacheSim::fully_associative("map", ways, 64, policy).unwrap();
    (array, map)
}

fn trace() -> impl Strategy<Value = Vec<(u64, bool)>> {
    // Few distinct lines so the trace mixes hits, misses, and evictions.
    prop::collection::vec((0u64..24, any::<bool>()), 1..400)
        .prop_map(|v| v.into_iter().map(|(line, store)| (line * 0x40 + 8, store)).collect())
}

proptest! {
    #[test]
    fn lru_map_matches_array(ways in 1usize..12, accesses in trace()) {
        let (mut array, mut map) = pair(ways, ReplacementPolicy::Lru);
        for (addr, store) in accesses {
            prop_assert_eq!(array.access(addr, 8, store), map.access(addr, 8, store));
        }
        prop_assert_eq!(array.stats(), map.stats());
    }

    #[test]
    fn fifo_map_matches_array(ways in 1usize..12, accesses in trace()) {
        let (mut array, mut map) = pair(ways, ReplacementPolicy::Fifo);
        for (addr, store) in accesses {
            prop_assert_eq!(array.access(addr, 8, store), map.access(addr, 8, store));
        }
        prop_assert_eq!(array.stats(), map.stats());
    }

    /// Repeating a read with no access in between always hits and counts no miss.
    #[test]
    fn immediate_repeat_read_hits(accesses in trace(), descriptor in prop::sample::select(vec!["4:2:64:L", "4:2:64:F", "4:2:64:R", "1:8:64:L"])) {
        let mut cache = cache(descriptor);
        for (addr, store) in accesses {
            cache.access(addr, 8, store);
            let misses = cache.stats().misses();
            prop_assert!(cache.access(addr, 8, false).is_hit());
            prop_assert_eq!(cache.stats().misses(), misses);
        }
    }
}
