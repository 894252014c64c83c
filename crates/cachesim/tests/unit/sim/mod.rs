/// Trace record parsing.
pub mod trace;

/// Replay of traces through a configured hierarchy.
pub mod replay;
