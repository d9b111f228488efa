use std::fs;
use std::io::Write;
use std::path::Path;

use dia_core::errors::{DiaError, ErrorInfo};
use serde::Serialize;

use crate::filter::{Resolution, ResolutionMode};
use crate::serde::to_canonical_json_bytes;

/// Outcome of processing a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Run directory path.
    pub directory: String,
    /// Seed parsed from the directory name.
    pub seed: u64,
    /// Selection scheme name.
    pub selection: String,
    /// Configured final generation.
    pub max_gen: u64,
    /// Rows kept after the resolution filter.
    pub time_points: usize,
    /// Whether the final generation was recorded.
    pub finished: bool,
}

/// Machine-readable summary of an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Number of run directories discovered.
    pub runs_found: usize,
    /// Per-run outcomes in processing order.
    pub runs: Vec<RunSummary>,
    /// Runs that stopped short of their final generation.
    pub unfinished: Vec<String>,
    /// Column header of the aggregate CSV.
    pub header: Vec<String>,
    /// Data rows written, header excluded.
    pub rows_written: usize,
    /// Path of the aggregate CSV.
    pub output: String,
    /// Quantity the stride was measured in.
    pub mode: ResolutionMode,
    /// Sampling stride used for every run.
    pub resolution: Resolution,
}

/// Writes the report as canonical JSON.
pub fn write_report(report: &AggregateReport, path: &Path) -> Result<(), DiaError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| DiaError::io("report.create_dir", parent, err))?;
    }
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(path, bytes).map_err(|err| DiaError::io("report.write", path, err))
}

/// Human-readable progress lines printed while aggregating.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    /// Wraps an output stream.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) -> Result<(), DiaError> {
        writeln!(self.out, "{}", text.as_ref()).map_err(|err| {
            DiaError::Io(
                ErrorInfo::new("console.write", "failed to print progress")
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Announces how many runs were discovered.
    pub fn runs_found(&mut self, count: usize) -> Result<(), DiaError> {
        self.line(format!("Found {count} run directories."))
    }

    /// Announces the run about to be loaded.
    pub fn extracting(&mut self, run: &str) -> Result<(), DiaError> {
        self.line(format!("Extracting information from {run}"))
    }

    /// Reports how many rows a run kept after filtering.
    pub fn time_points(&mut self, count: usize) -> Result<(), DiaError> {
        self.line(format!("  Time points: {count}"))
    }

    /// Prints the unfinished-run section, even when it is empty.
    pub fn unfinished(&mut self, runs: &[String]) -> Result<(), DiaError> {
        self.line("=============================")?;
        self.line(format!("Unfinished runs ({})", runs.len()))?;
        for run in runs {
            self.line(format!("  - {run}"))?;
        }
        Ok(())
    }

    /// Prints the completion line naming the output file.
    pub fn done(&mut self, output: &Path) -> Result<(), DiaError> {
        self.line(format!("DONE! Output written to {}", output.display()))
    }
}
