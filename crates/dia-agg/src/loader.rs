use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use dia_core::errors::{DiaError, ErrorInfo};
use dia_core::GEN_FIELD;
use tracing::debug;

use crate::row::MetricRow;

const PHENOTYPE_PREFIX: &str = "phen_";
const GENOTYPE_PREFIX: &str = "gen_";

/// Applies the header rename and prefix rules for the file at `path`.
///
/// `update` becomes `gen` (or `generation` when no `update` column exists);
/// phenotype files prefix every other column with `phen_`, genotype files
/// with `gen_`.
pub fn normalize_header(mut header: Vec<String>, path: &Path) -> Vec<String> {
    if let Some(idx) = header.iter().position(|name| name == "update") {
        header[idx] = GEN_FIELD.to_string();
    } else if let Some(idx) = header.iter().position(|name| name == "generation") {
        header[idx] = GEN_FIELD.to_string();
    }

    let path_str = path.to_string_lossy();
    for (marker, prefix) in [("phenotype", PHENOTYPE_PREFIX), ("genotype", GENOTYPE_PREFIX)] {
        if path_str.contains(marker) {
            for name in header.iter_mut().filter(|name| name.as_str() != GEN_FIELD) {
                name.insert_str(0, prefix);
            }
        }
    }
    header
}

/// Drops spaces that open a field, leaving quoted content untouched, so
/// `"3", "a,b"` reads the same as `"3","a,b"`.
pub(crate) fn skip_initial_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quoted = false;
    let mut field_start = true;
    for ch in text.chars() {
        if field_start && !quoted && ch == ' ' {
            continue;
        }
        field_start = false;
        match ch {
            '"' => quoted = !quoted,
            ',' | '\n' if !quoted => field_start = true,
            _ => {}
        }
        out.push(ch);
    }
    out
}

/// Reads a metric CSV fully into memory.
pub fn read_metric_csv(path: &Path) -> Result<Vec<MetricRow>, DiaError> {
    let content = fs::read_to_string(path).map_err(|err| DiaError::io("loader.read", path, err))?;
    let rows = parse_metric_csv(&content, path)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded metric source");
    Ok(rows)
}

/// Parses metric CSV text. The header line is split on bare commas; data
/// lines use quoted-field semantics.
pub fn parse_metric_csv(content: &str, path: &Path) -> Result<Vec<MetricRow>, DiaError> {
    let content = content.trim();
    let (header_line, body) = content.split_once('\n').unwrap_or((content, ""));
    let raw_header = header_line
        .trim_end_matches('\r')
        .split(',')
        .map(str::to_string)
        .collect();
    let header = normalize_header(raw_header, path);
    let gen_idx = header
        .iter()
        .position(|name| name == GEN_FIELD)
        .ok_or_else(|| {
            DiaError::Parse(
                ErrorInfo::new("loader.missing_gen", "metric file has no generation column")
                    .with_context("header", header_line.trim())
                    .with_path(path)
                    .with_hint("expected an `update` or `generation` column"),
            )
        })?;

    let body = skip_initial_space(body);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|err| {
            DiaError::Parse(ErrorInfo::new("loader.record", err.to_string()).with_path(path))
        })?;
        let line = record.position().map(|pos| pos.line() + 1).unwrap_or(0);
        if record.len() < header.len() {
            return Err(DiaError::Parse(
                ErrorInfo::new("loader.short_row", "row has fewer fields than the header")
                    .with_context("line", line.to_string())
                    .with_context("expected", header.len().to_string())
                    .with_context("found", record.len().to_string())
                    .with_path(path),
            ));
        }
        if record.len() > header.len() {
            return Err(DiaError::Parse(
                ErrorInfo::new("loader.long_row", "row has more fields than the header")
                    .with_context("line", line.to_string())
                    .with_context("expected", header.len().to_string())
                    .with_context("found", record.len().to_string())
                    .with_path(path),
            ));
        }
        let raw_gen = &record[gen_idx];
        let gen = raw_gen.trim().parse::<u64>().map_err(|err| {
            DiaError::Parse(
                ErrorInfo::new("loader.gen_value", "generation is not a non-negative integer")
                    .with_context("line", line.to_string())
                    .with_context("value", raw_gen)
                    .with_path(path)
                    .with_hint(err.to_string()),
            )
        })?;
        let mut row = MetricRow::new(gen);
        for (name, value) in header.iter().zip(record.iter()) {
            row.insert(name.as_str(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}
