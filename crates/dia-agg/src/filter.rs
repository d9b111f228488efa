use std::num::NonZeroU64;

use dia_core::errors::{DiaError, ErrorInfo};
use serde::Serialize;

use crate::enrich::RunProfile;
use crate::row::MetricRow;

/// Quantity the resolution stride is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Stride over generation indices.
    #[default]
    Generations,
    /// Stride over cumulative evaluation counts.
    Evaluations,
}

impl ResolutionMode {
    /// Maps the `--by_evals` flag onto a mode.
    pub fn from_by_evals(by_evals: bool) -> Self {
        if by_evals {
            ResolutionMode::Evaluations
        } else {
            ResolutionMode::Generations
        }
    }
}

/// Sampling stride, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Resolution(NonZeroU64);

impl Resolution {
    /// Validates a raw stride taken from the command line.
    pub fn new(raw: i64) -> Result<Self, DiaError> {
        u64::try_from(raw)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Resolution)
            .ok_or_else(|| {
                DiaError::Config(
                    ErrorInfo::new("options.resolution", "Resolution must be >= 1")
                        .with_context("resolution", raw.to_string()),
                )
            })
    }

    /// The stride as an integer.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution(NonZeroU64::MIN)
    }
}

/// Keeps an evenly spaced sample of a run's trajectory plus its final
/// generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionFilter {
    resolution: Resolution,
    mode: ResolutionMode,
    max_gen: u64,
    evals_per_gen: f64,
}

impl ResolutionFilter {
    /// Builds a filter from explicit run parameters.
    pub fn new(
        resolution: Resolution,
        mode: ResolutionMode,
        max_gen: u64,
        evals_per_gen: f64,
    ) -> Self {
        Self {
            resolution,
            mode,
            max_gen,
            evals_per_gen,
        }
    }

    /// Builds the filter for one run from its profile.
    pub fn for_run(resolution: Resolution, mode: ResolutionMode, profile: &RunProfile) -> Self {
        Self::new(resolution, mode, profile.max_gen, profile.evals_per_gen())
    }

    /// Returns true when the row at generation `gen` is retained.
    pub fn keeps(&self, gen: u64) -> bool {
        let value = match self.mode {
            ResolutionMode::Generations => gen,
            // Truncation matches how evaluation counts were bucketed historically.
            ResolutionMode::Evaluations => (gen as f64 * self.evals_per_gen) as u64,
        };
        value % self.resolution.get() == 0 || gen == self.max_gen
    }

    /// Keeps the retained rows, preserving order.
    pub fn apply(&self, rows: Vec<MetricRow>) -> Vec<MetricRow> {
        rows.into_iter().filter(|row| self.keeps(row.gen)).collect()
    }
}
