use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use dia_core::errors::DiaError;
use serde::{Deserialize, Serialize};

use crate::filter::{Resolution, ResolutionMode};
use crate::serde::from_yaml_slice;

/// File name of the optional genotype systematics source.
pub const GENOTYPE_SYSTEMATICS: &str = "genotype_systematics.csv";

/// YAML-configurable knobs describing run directory layout and schema
/// exclusions. Every field has a default so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Substring that identifies a run directory.
    #[serde(default = "default_run_marker")]
    pub run_marker: String,
    /// Two-column `parameter,value` file inside each run directory.
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
    /// Metric files merged per run, in merge order (later files win).
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
    /// Appends `genotype_systematics.csv` to `sources` when set.
    #[serde(default)]
    pub include_genotype_systematics: bool,
    /// Run parameters left out of the aggregate table.
    #[serde(default = "default_config_exclude")]
    pub config_exclude: BTreeSet<String>,
    /// Data columns left out of the aggregate table.
    #[serde(default)]
    pub data_field_exclude: BTreeSet<String>,
}

fn default_run_marker() -> String {
    "RUN_".to_string()
}

fn default_settings_file() -> String {
    "run_config.csv".to_string()
}

fn default_sources() -> Vec<String> {
    ["data.csv", "phylodiversity.csv", "phenotype_systematics.csv"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_config_exclude() -> BTreeSet<String> {
    [
        "MU",
        "FIT_SIGMA",
        "FIT_ALPHA",
        "PNORM_EXP",
        "NOVEL_K",
        "DSLEX_PROP",
        "COH_LEX_PROP",
        "SNAP_INTERVAL",
        "PRINT_INTERVAL",
        "OUTPUT_DIR",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            run_marker: default_run_marker(),
            settings_file: default_settings_file(),
            sources: default_sources(),
            include_genotype_systematics: false,
            config_exclude: default_config_exclude(),
            data_field_exclude: BTreeSet::new(),
        }
    }
}

impl AggregateConfig {
    /// Source file names in merge order.
    pub fn source_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.sources.iter().map(String::as_str).collect();
        if self.include_genotype_systematics && !files.contains(&GENOTYPE_SYSTEMATICS) {
            files.push(GENOTYPE_SYSTEMATICS);
        }
        files
    }
}

/// Loads an [`AggregateConfig`] from a YAML file.
pub fn load_config(path: &Path) -> Result<AggregateConfig, DiaError> {
    let bytes = fs::read(path).map_err(|err| DiaError::io("config.read", path, err))?;
    from_yaml_slice(&bytes)
}

/// Per-invocation options, validated at the command-line boundary.
#[derive(Debug, Clone)]
pub struct AggregateOpts {
    /// Roots scanned for run directories.
    pub data: Vec<PathBuf>,
    /// Output directory, created when missing.
    pub dump: PathBuf,
    /// Whether the resolution stride counts generations or evaluations.
    pub mode: ResolutionMode,
    /// Sampling stride applied to every run.
    pub resolution: Resolution,
    /// File name of the aggregate CSV inside `dump`.
    pub out_fname: String,
}

impl AggregateOpts {
    /// Options with the command-line defaults for the given data roots.
    pub fn new(data: Vec<PathBuf>) -> Self {
        Self {
            data,
            dump: PathBuf::from("."),
            mode: ResolutionMode::Generations,
            resolution: Resolution::default(),
            out_fname: "timeseries.csv".to_string(),
        }
    }

    /// Full path of the aggregate CSV.
    pub fn output_path(&self) -> PathBuf {
        self.dump.join(&self.out_fname)
    }
}
