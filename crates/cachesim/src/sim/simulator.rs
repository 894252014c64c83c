//! Trace replay driver.
//!
//! `TraceSimulator` owns a built hierarchy together with its entry ports and feeds it
//! trace records: fetches enter the I-cache, loads and stores the D-cache. Records whose
//! first-level cache is not configured are counted and skipped.

use serde::Serialize;
use tracing::{debug, info};

use super::trace::TraceRecord;
use crate::common::{ConfigError, TraceError};
use crate::config::HierarchyConfig;
use crate::hierarchy::{Hierarchy, Ports};

/// Record counts of a replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Records consumed.
    pub records: u64,
    /// Records that entered a cache.
    pub simulated: u64,
    /// Records with no first-level cache to enter.
    pub unsimulated: u64,
}

/// Top-level simulator: hierarchy + routing.
#[derive(Debug)]
pub struct TraceSimulator {
    hierarchy: Hierarchy,
    ports: Ports,
    summary: ReplaySummary,
}

impl TraceSimulator {
    /// Creates a simulator over an already built hierarchy.
    pub const fn new(hierarchy: Hierarchy, ports: Ports) -> Self {
        Self {
            hierarchy,
            ports,
            summary: ReplaySummary {
                records: 0,
                simulated: 0,
                unsimulated: 0,
            },
        }
    }

    /// Builds the hierarchy described by `config` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the first invalid level.
    pub fn from_config(config: &HierarchyConfig) -> Result<Self, ConfigError> {
        let (hierarchy, ports) = Hierarchy::from_config(config)?;
        Ok(Self::new(hierarchy, ports))
    }

    /// Replays one record. Returns whether it entered a cache.
    ///
    /// # Errors
    ///
    /// Fails if the ports name a node this hierarchy does not have.
    pub fn step(&mut self, record: &TraceRecord) -> Result<bool, TraceError> {
        self.summary.records += 1;
        let Some(entry) = self.ports.route(record.kind) else {
            self.summary.unsimulated += 1;
            return Ok(false);
        };
        self.hierarchy
            .access(entry, record.addr, record.bytes, record.kind.is_store())?;
        self.summary.simulated += 1;
        Ok(true)
    }

    /// Replays every record of `records`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first malformed record or read failure. Records before it have
    /// already been simulated.
    pub fn run<I>(&mut self, records: I) -> Result<ReplaySummary, TraceError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        for record in records {
            let record = record?;
            let _ = self.step(&record)?;
        }
        if self.summary.unsimulated > 0 {
            debug!(count = self.summary.unsimulated, "records without a first-level cache");
        }
        info!(
            records = self.summary.records,
            simulated = self.summary.simulated,
            "trace replay finished"
        );
        Ok(self.summary)
    }

    /// Counts so far.
    pub const fn summary(&self) -> ReplaySummary {
        self.summary
    }

    /// Entry ports of the hierarchy.
    pub const fn ports(&self) -> Ports {
        self.ports
    }

    /// The simulated hierarchy.
    pub const fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// The simulated hierarchy, for attaching reporters or toggling logging.
    pub const fn hierarchy_mut(&mut self) -> &mut Hierarchy {
        &mut self.hierarchy
    }

    /// Releases the hierarchy. Dropping it reports every cache's statistics.
    pub fn into_hierarchy(self) -> Hierarchy {
        self.hierarchy
    }
}
