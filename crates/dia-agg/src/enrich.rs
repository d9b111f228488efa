use dia_core::errors::DiaError;
use dia_core::{FieldValue, SelectionScheme};

use crate::row::MetricRow;
use crate::settings::RunSettings;

/// Cumulative fitness evaluations at a generation.
pub const EVALUATIONS: &str = "evaluations";
/// Human-readable selection scheme name.
pub const SELECTION_NAME: &str = "selection_name";
/// Proportion of the test set sampled per evaluation.
pub const TEST_SAMPLE_PROP: &str = "test_sample_prop";
/// Run directory the row came from.
pub const DIRECTORY: &str = "directory";

/// Settings of a run that drive derived columns and the completion check.
#[derive(Debug, Clone, PartialEq)]
pub struct RunProfile {
    /// Decoded `SELECTION` setting.
    pub selection: SelectionScheme,
    /// Configured final generation (`MAX_GENS`).
    pub max_gen: u64,
    /// Population size (`POP_SIZE`).
    pub pop_size: u64,
    /// Number of test cases (`OBJECTIVE_CNT`).
    pub objective_cnt: u64,
    /// Share of the test set each evaluation touches.
    pub test_sample_prop: f64,
}

impl RunProfile {
    /// Reads the profile from run settings. Down-sampled and cohort lexicase
    /// runs also require their sample proportion parameter.
    pub fn from_settings(settings: &RunSettings) -> Result<Self, DiaError> {
        let selection = SelectionScheme::from_code(settings.require("SELECTION")?)?;
        let test_sample_prop = match selection.sample_prop_key() {
            Some(key) => settings.parse_required::<f64>(key)?,
            None => 1.0,
        };
        Ok(Self {
            selection,
            max_gen: settings.parse_required("MAX_GENS")?,
            pop_size: settings.parse_required("POP_SIZE")?,
            objective_cnt: settings.parse_required("OBJECTIVE_CNT")?,
            test_sample_prop,
        })
    }

    /// Evaluations performed per generation.
    pub fn evals_per_gen(&self) -> f64 {
        self.pop_size as f64 * (self.objective_cnt as f64 * self.test_sample_prop)
    }

    /// Fitness evaluations performed through generation `gen`.
    pub fn evaluations(&self, gen: u64) -> f64 {
        gen as f64 * self.evals_per_gen()
    }

    /// A run is finished when its configured final generation was recorded.
    pub fn is_finished(&self, rows: &[MetricRow]) -> bool {
        rows.iter().any(|row| row.gen == self.max_gen)
    }
}

/// Attaches the derived per-row columns.
pub fn enrich_rows(rows: &mut [MetricRow], profile: &RunProfile, directory: &str) {
    for row in rows.iter_mut() {
        row.insert(EVALUATIONS, FieldValue::Float(profile.evaluations(row.gen)));
        row.insert(SELECTION_NAME, profile.selection.name());
        row.insert(TEST_SAMPLE_PROP, FieldValue::Float(profile.test_sample_prop));
        row.insert(DIRECTORY, directory);
    }
}
