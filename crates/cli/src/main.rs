//! Trace-driven cache hierarchy simulator CLI.
//!
//! This binary replays a memory trace through a configured hierarchy. It performs:
//! 1. **Configuration:** Builds the I-cache, D-cache and L2 from `sets:ways:blocksize[:policy]`
//!    descriptors, a JSON hierarchy document, or both (descriptors override the document).
//! 2. **Replay:** Reads `<kind> <addr> [<bytes>]` records from a file or standard input;
//!    fetches enter the I-cache, loads and stores the D-cache.
//! 3. **Reporting:** Prints every cache's statistics when the hierarchy is torn down, as text
//!    or as JSON lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cachesim_core::common::{CONFIG_USAGE, ConfigError, TraceError};
use cachesim_core::config::{CacheConfig, HierarchyConfig};
use cachesim_core::sim::{ReplaySummary, TraceReader, TraceSimulator};
use cachesim_core::stats::{JsonReporter, StatsReporter, TextReporter};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven cache hierarchy simulator",
    long_about = "Replay a memory trace through an I-cache, D-cache and optional L2.\n\nTrace records are `<kind> <addr> [<bytes>]` with kind r/w/i (or 0/1/2), a hexadecimal address and an optional decimal size.\n\nExamples:\n  cachesim --dc 64:4:64:L trace.txt\n  cachesim --ic 64:4:64 --dc 64:4:64 --l2 1024:8:64:F < trace.txt\n  cachesim --config hierarchy.json --json trace.txt"
)]
struct Cli {
    /// Instruction cache, as sets:ways:blocksize[:policy].
    #[arg(long = "ic", value_name = "DESC")]
    icache: Option<String>,

    /// Data cache, as sets:ways:blocksize[:policy].
    #[arg(long = "dc", value_name = "DESC")]
    dcache: Option<String>,

    /// Shared L2 cache, as sets:ways:blocksize[:policy].
    #[arg(long, value_name = "DESC")]
    l2: Option<String>,

    /// JSON hierarchy document; descriptors given on the command line replace its levels.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every miss (target `cachesim::miss`, debug level).
    #[arg(long)]
    log_misses: bool,

    /// Report statistics as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    /// Trace file; standard input when omitted.
    trace: Option<PathBuf>,
}

/// Anything that ends the run early.
#[derive(Debug, Error)]
enum Failure {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Final record counts, printed after the cache statistics.
#[derive(Serialize)]
struct Summary {
    unsimulated: u64,
    records: u64,
}

fn main() {
    let cli = Cli::parse();
    let config = match hierarchy_config(&cli) {
        Ok(config) => config,
        Err(e) => config_failure(&e),
    };
    init_tracing(config.log_misses);

    match run(&cli, &config) {
        Ok(summary) => print_summary(&summary, cli.json),
        Err(Failure::Config(e)) => config_failure(&e),
        Err(Failure::Trace(e)) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn config_failure(e: &ConfigError) -> ! {
    eprintln!("Error: {e}");
    eprintln!("{CONFIG_USAGE}");
    process::exit(1);
}

/// Filter used when `RUST_LOG` is unset.
const fn default_filter(log_misses: bool) -> &'static str {
    if log_misses {
        "warn,cachesim::miss=debug"
    } else {
        "warn"
    }
}

/// Installs the subscriber. `RUST_LOG` wins; otherwise miss logging from either
/// `--log-misses` or the configuration document turns the miss target on.
fn init_tracing(log_misses: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_misses)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Builds the hierarchy, replays the trace, and tears the hierarchy down.
///
/// Statistics are printed by the reporters as the hierarchy drops, which happens on
/// every return path once it has been built, including a malformed trace.
fn run(cli: &Cli, config: &HierarchyConfig) -> Result<ReplaySummary, Failure> {
    debug!(?config, "hierarchy configuration");

    let mut sim = TraceSimulator::from_config(config)?;
    let hierarchy = sim.hierarchy_mut();
    let ids: Vec<_> = hierarchy.caches().map(|(id, _)| id).collect();
    for id in ids {
        let reporter: Box<dyn StatsReporter> = if cli.json {
            Box::new(JsonReporter::stdout())
        } else {
            Box::new(TextReporter::stdout())
        };
        hierarchy
            .cache_mut(id)
            .map_err(ConfigError::from)?
            .set_reporter(reporter);
    }

    let source = open_trace(cli.trace.as_deref())?;
    let summary = sim.run(TraceReader::new(source))?;
    info!(?summary, "replay complete");
    Ok(summary)
}

/// Merges the optional JSON document with the command-line descriptors.
fn hierarchy_config(cli: &Cli) -> Result<HierarchyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => HierarchyConfig::load(path)?,
        None => HierarchyConfig::default(),
    };
    if let Some(desc) = &cli.icache {
        config.icache = Some(CacheConfig::parse(desc, "I$")?);
    }
    if let Some(desc) = &cli.dcache {
        config.dcache = Some(CacheConfig::parse(desc, "D$")?);
    }
    if let Some(desc) = &cli.l2 {
        config.l2 = Some(CacheConfig::parse(desc, "L2$")?);
    }
    config.log_misses |= cli.log_misses;
    Ok(config)
}

fn open_trace(path: Option<&Path>) -> Result<Box<dyn BufRead>, TraceError> {
    match path {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn print_summary(summary: &ReplaySummary, json: bool) {
    if json {
        let line = Summary {
            unsimulated: summary.unsimulated,
            records: summary.records,
        };
        match serde_json::to_string(&line) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    } else if summary.unsimulated > 0 {
        println!(
            "{} of {} records had no first-level cache and were not simulated",
            summary.unsimulated, summary.records
        );
    }
}
