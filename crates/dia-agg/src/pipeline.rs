use std::io::Write;
use std::path::{Path, PathBuf};

use dia_core::errors::{DiaError, ErrorInfo};
use tracing::{debug, info, warn};

use crate::config::{AggregateConfig, AggregateOpts};
use crate::discovery::{discover_runs, RunDir};
use crate::enrich::{enrich_rows, RunProfile};
use crate::filter::ResolutionFilter;
use crate::loader::read_metric_csv;
use crate::merge::merge_rows;
use crate::report::{AggregateReport, Console, RunSummary};
use crate::row::MetricRow;
use crate::schema::{RunSchema, SchemaValidator};
use crate::settings::{extract_settings, RunSettings};
use crate::writer::{write_table, AggregateTable};

/// A run with its sources merged and derived columns attached, before the
/// resolution filter.
#[derive(Debug, Clone)]
pub struct LoadedRun {
    /// Directory the run was loaded from.
    pub run: RunDir,
    /// Raw run configuration.
    pub settings: RunSettings,
    /// Parameters decoded from the configuration.
    pub profile: RunProfile,
    /// Merged and enriched rows in generation order.
    pub rows: Vec<MetricRow>,
    /// Whether the final generation was recorded.
    pub finished: bool,
}

fn require_file(path: &Path) -> Result<(), DiaError> {
    if path.is_file() {
        return Ok(());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Err(DiaError::MissingInput(
        ErrorInfo::new("run.missing_file", format!("Failed to find {name}")).with_path(path),
    ))
}

/// Loads, merges and enriches every source of one run directory.
///
/// All expected files are checked before any is read, so a run missing a
/// source fails without partial work.
pub fn load_run(run: &RunDir, config: &AggregateConfig) -> Result<LoadedRun, DiaError> {
    let settings_path = run.path.join(&config.settings_file);
    let source_paths: Vec<PathBuf> = config
        .source_files()
        .into_iter()
        .map(|file| run.path.join(file))
        .collect();
    require_file(&settings_path)?;
    for path in &source_paths {
        require_file(path)?;
    }

    let settings = extract_settings(&settings_path)?;
    let profile = RunProfile::from_settings(&settings)?;

    let mut rows = Vec::new();
    for path in &source_paths {
        rows.extend(read_metric_csv(path)?);
    }
    let mut rows = merge_rows(rows);
    let finished = profile.is_finished(&rows);
    enrich_rows(&mut rows, &profile, &run.display_name());
    debug!(
        run = %run.path.display(),
        generations = rows.len(),
        finished,
        "merged run sources"
    );

    Ok(LoadedRun {
        run: run.clone(),
        settings,
        profile,
        rows,
        finished,
    })
}

/// Runs the whole aggregation and writes the combined CSV.
///
/// Nothing is written unless every run loads and agrees on the schema.
pub fn aggregate<W: Write>(
    opts: &AggregateOpts,
    config: &AggregateConfig,
    console: &mut Console<W>,
) -> Result<AggregateReport, DiaError> {
    let runs = discover_runs(&opts.data, &config.run_marker)?;
    console.runs_found(runs.len())?;
    if runs.is_empty() {
        return Err(DiaError::MissingInput(
            ErrorInfo::new("discovery.empty", "no run directories found")
                .with_context("marker", config.run_marker.as_str())
                .with_hint("run directories must contain the run marker in their name"),
        ));
    }

    let mut validator = SchemaValidator::new();
    let mut rows = Vec::new();
    let mut summaries = Vec::with_capacity(runs.len());
    let mut unfinished = Vec::new();
    for run in &runs {
        let name = run.display_name();
        console.extracting(&name)?;
        let loaded = load_run(run, config)?;
        if !loaded.finished {
            warn!(
                run = %name,
                max_gen = loaded.profile.max_gen,
                "run did not reach its final generation"
            );
            unfinished.push(name.clone());
        }

        let schema = RunSchema::new(loaded.rows.first(), &loaded.settings, config);
        let filter = ResolutionFilter::for_run(opts.resolution, opts.mode, &loaded.profile);
        let kept = filter.apply(loaded.rows);
        validator.admit(&run.path, &schema)?;

        rows.extend(kept.iter().map(|row| schema.render(row, &loaded.settings)));
        console.time_points(kept.len())?;
        summaries.push(RunSummary {
            directory: name,
            seed: run.seed,
            selection: loaded.profile.selection.name().to_string(),
            max_gen: loaded.profile.max_gen,
            time_points: kept.len(),
            finished: loaded.finished,
        });
    }
    console.unfinished(&unfinished)?;

    let header = validator
        .agreed_header()
        .map(<[String]>::to_vec)
        .unwrap_or_default();
    let table = AggregateTable { header, rows };
    let output = opts.output_path();
    write_table(&table, &output)?;
    info!(path = %output.display(), rows = table.rows.len(), "wrote aggregate table");
    console.done(&output)?;

    Ok(AggregateReport {
        runs_found: runs.len(),
        runs: summaries,
        unfinished,
        rows_written: table.rows.len(),
        header: table.header,
        output: output.display().to_string(),
        mode: opts.mode,
        resolution: opts.resolution,
    })
}
