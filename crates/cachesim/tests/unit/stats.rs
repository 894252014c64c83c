//! Statistics Unit Tests.
//!
//! Verifies the counters a cache accumulates, the text and JSON renderings, and
//! that a dropped cache hands its statistics to its reporter exactly once.

use cachesim_core::cache::CacheSim;
use cachesim_core::stats::{CacheStats, JsonReporter, StatsReporter, TextReporter};
use pretty_assertions::assert_eq;

use crate::common::builder::named_cache;
use crate::common::mocks::MockReporter;

/// The four-access conflict scenario: three misses, one hit.
fn exercised() -> CacheSim {
    let mut cache = named_cache("4:2:64:L", "D$");
    cache.access(0x0, 8, false);
    cache.access(0x1000, 8, false);
    cache.access(0x0, 8, false);
    cache.access(0x2000, 8, true);
    cache
}

// ══════════════════════════════════════════════════════════
// 1. Counters
// ══════════════════════════════════════════════════════════

#[test]
fn fresh_stats_are_zero() {
    let stats = CacheStats::default();
    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.misses(), 0);
    assert_eq!(stats.hits(), 0);
    assert!(stats.miss_rate().abs() < f64::EPSILON);
}

#[test]
fn derived_counters() {
    let cache = exercised();
    let stats = cache.stats();
    assert_eq!(stats.accesses(), 4);
    assert_eq!(stats.misses(), 3);
    assert_eq!(stats.hits(), 1);
    assert!((stats.miss_rate() - 75.0).abs() < 1e-9);
}

// ══════════════════════════════════════════════════════════
// 2. Rendering
// ══════════════════════════════════════════════════════════

#[test]
fn text_format_lists_every_counter() {
    let expected = concat!(
        "D$ Bytes Read:            24\n",
        "D$ Bytes Written:         8\n",
        "D$ Read Accesses:         3\n",
        "D$ Write Accesses:        1\n",
        "D$ Read Misses:           2\n",
        "D$ Write Misses:          1\n",
        "D$ Writebacks:            0\n",
        "D$ Miss Rate:             75.000%\n",
    );
    assert_eq!(exercised().stats().format_text("D$"), expected);
}

#[test]
fn text_reporter_skips_idle_caches() {
    let mut reporter = TextReporter::new(Vec::new());
    reporter.report("I$", &CacheStats::default());
    reporter.report("D$", exercised().stats());

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(text.starts_with("D$ Bytes Read:"));
    assert!(!text.contains("I$"));
    assert_eq!(text.lines().count(), 8);
}

#[test]
fn json_reporter_writes_one_object_per_line() {
    let mut reporter = JsonReporter::new(Vec::new());
    reporter.report("D$", exercised().stats());
    reporter.report("I$", &CacheStats::default());

    let contents = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["name"], "D$");
    assert_eq!(lines[0]["read_accesses"], 3);
    assert_eq!(lines[0]["write_misses"], 1);
    assert_eq!(lines[0]["miss_rate"], 75.0);
    assert_eq!(lines[1]["read_accesses"], 0);
}

// ══════════════════════════════════════════════════════════
// 3. Reporting on Drop
// ══════════════════════════════════════════════════════════

#[test]
fn dropping_a_cache_reports_once() {
    let mut reporter = MockReporter::new();
    reporter
        .expect_report()
        .withf(|name, stats| name == "D$" && stats.accesses() == 4)
        .times(1)
        .return_const(());

    let mut cache = exercised();
    cache.set_reporter(Box::new(reporter));
    drop(cache);
}

#[test]
fn duplicate_does_not_inherit_reporter() {
    let mut reporter = MockReporter::new();
    reporter.expect_report().times(1).return_const(());

    let mut cache = exercised();
    cache.set_reporter(Box::new(reporter));
    let copy = cache.duplicate();
    drop(copy);
    drop(cache);
}

#[test]
fn unattached_cache_drops_silently() {
    drop(exercised());
}
