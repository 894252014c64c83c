//! Trace Record Tests.
//!
//! Verifies the `<kind> <addr> [<bytes>]` record format and the line-numbered
//! errors of the streaming reader.

use cachesim_core::common::{AccessKind, TraceError};
use cachesim_core::sim::{TraceReader, TraceRecord};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn record(kind: AccessKind, addr: u64, bytes: usize) -> Option<TraceRecord> {
    Some(TraceRecord { kind, addr, bytes })
}

#[rstest]
#[case("r 1000", record(AccessKind::Load, 0x1000, 8))]
#[case("w 0x2a 4", record(AccessKind::Store, 0x2a, 4))]
#[case("i 0X80000000 2", record(AccessKind::Fetch, 0x8000_0000, 2))]
#[case("0 ff", record(AccessKind::Load, 0xff, 8))]
#[case("1 ff 1", record(AccessKind::Store, 0xff, 1))]
#[case("2 40", record(AccessKind::Fetch, 0x40, 8))]
#[case("  W\tdeadbeef   16  ", record(AccessKind::Store, 0xdead_beef, 16))]
#[case("", None)]
#[case("   ", None)]
#[case("# comment", None)]
fn parses_records(#[case] line: &str, #[case] expected: Option<TraceRecord>) {
    assert_eq!(TraceRecord::parse(line, 1).unwrap(), expected);
}

#[rstest]
#[case("x 1000", "unknown access kind 'x'")]
#[case("r", "missing address")]
#[case("r 0xzz", "bad address '0xzz'")]
#[case("r 10 eight", "bad size 'eight'")]
#[case("r 10 0", "access size must be positive")]
#[case("r 10 8 extra", "unexpected field 'extra'")]
fn rejects_malformed_records(#[case] line: &str, #[case] reason_prefix: &str) {
    match TraceRecord::parse(line, 7) {
        Err(TraceError::Malformed { line, reason }) => {
            assert_eq!(line, 7);
            assert!(reason.starts_with(reason_prefix), "{reason}");
        }
        other => panic!("expected malformed record, got {other:?}"),
    }
}

#[test]
fn reader_yields_records_in_order() {
    let text = "# dinero-style\ni 400\n\nr 1000 4\nw 1004 4\n";
    let records: Vec<TraceRecord> = TraceReader::new(text.as_bytes())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        records,
        [
            TraceRecord {
                kind: AccessKind::Fetch,
                addr: 0x400,
                bytes: 8,
            },
            TraceRecord {
                kind: AccessKind::Load,
                addr: 0x1000,
                bytes: 4,
            },
            TraceRecord {
                kind: AccessKind::Store,
                addr: 0x1004,
                bytes: 4,
            },
        ]
    );
}

#[test]
fn reader_reports_physical_line_numbers() {
    let text = "r 0\n\n# skipped\nq 0\n";
    let err = TraceReader::new(text.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_err();
    assert!(matches!(err, TraceError::Malformed { line: 4, .. }));
}
