//! Aggregation of per-run evolutionary experiment output into one
//! time-series table.
//!
//! The pipeline is linear: [`discovery`] finds run directories, [`loader`]
//! and [`settings`] read each run's files, [`merge`] joins sources on the
//! generation, [`enrich`] attaches derived columns, [`filter`] down-samples,
//! [`schema`] checks every run agrees on the output columns and [`writer`]
//! emits the combined CSV.

#![deny(missing_docs)]

/// YAML configuration and per-invocation options.
pub mod config;
/// Run directory discovery under the data roots.
pub mod discovery;
/// Derived per-row columns and run profiles.
pub mod enrich;
/// Resolution down-sampling.
pub mod filter;
/// Metric CSV loading and header normalization.
pub mod loader;
/// Joining metric sources on the generation.
pub mod merge;
/// End-to-end aggregation.
pub mod pipeline;
/// Console progress and JSON run summaries.
pub mod report;
/// Per-generation metric rows.
pub mod row;
/// Output column sets and cross-run agreement.
pub mod schema;
/// Canonical JSON and YAML helpers.
pub mod serde;
/// Run configuration files.
pub mod settings;
/// Aggregate CSV output.
pub mod writer;

pub use config::{load_config, AggregateConfig, AggregateOpts};
pub use discovery::{discover_runs, RunDir};
pub use enrich::RunProfile;
pub use filter::{Resolution, ResolutionFilter, ResolutionMode};
pub use merge::merge_rows;
pub use pipeline::{aggregate, load_run, LoadedRun};
pub use report::{write_report, AggregateReport, Console, RunSummary};
pub use row::MetricRow;
pub use schema::{RunSchema, SchemaValidator};
pub use writer::{write_table, AggregateTable};
