use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::ReaderBuilder;
use dia_core::errors::{DiaError, ErrorInfo};

use crate::loader::skip_initial_space;

const PARAMETER: &str = "parameter";
const VALUE: &str = "value";

/// Parameter name to raw value mapping read from a run's configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSettings {
    values: BTreeMap<String, String>,
    source: PathBuf,
}

impl RunSettings {
    /// Builds settings from in-memory pairs.
    pub fn from_pairs<I, K, V>(source: impl Into<PathBuf>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            source: source.into(),
        }
    }

    /// Raw value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Raw value of `key`, or a missing-input error naming it.
    pub fn require(&self, key: &str) -> Result<&str, DiaError> {
        self.get(key).ok_or_else(|| {
            DiaError::MissingInput(
                ErrorInfo::new(
                    "settings.missing_key",
                    "run configuration lacks a required parameter",
                )
                    .with_context("parameter", key)
                    .with_path(&self.source),
            )
        })
    }

    /// Parses the value of `key`, failing when it is absent or malformed.
    pub fn parse_required<T>(&self, key: &str) -> Result<T, DiaError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        let raw = self.require(key)?;
        raw.trim().parse::<T>().map_err(|err| {
            DiaError::Config(
                ErrorInfo::new("settings.invalid_value", "run parameter has an unusable value")
                    .with_context("parameter", key)
                    .with_context("value", raw)
                    .with_path(&self.source)
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Parameter names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }
}

/// Reads a `parameter,value` file. Column order is taken from the header.
pub fn extract_settings(path: &Path) -> Result<RunSettings, DiaError> {
    let content = fs::read_to_string(path).map_err(|err| DiaError::io("settings.read", path, err))?;
    parse_settings(&content, path)
}

/// Parses the text of a run configuration file.
pub fn parse_settings(content: &str, path: &Path) -> Result<RunSettings, DiaError> {
    let content = content.trim();
    let (header_line, body) = content.split_once('\n').unwrap_or((content, ""));
    let header: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let column = |name: &str| {
        header.iter().position(|h| *h == name).ok_or_else(|| {
            DiaError::Parse(
                ErrorInfo::new("settings.header", "configuration header lacks a column")
                    .with_context("column", name)
                    .with_context("header", header_line.trim())
                    .with_path(path),
            )
        })
    };
    let param_idx = column(PARAMETER)?;
    let value_idx = column(VALUE)?;

    let body = skip_initial_space(body);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut values = BTreeMap::new();
    for result in reader.records() {
        let record = result.map_err(|err| {
            DiaError::Parse(ErrorInfo::new("settings.record", err.to_string()).with_path(path))
        })?;
        match (record.get(param_idx), record.get(value_idx)) {
            (Some(param), Some(value)) => {
                values.insert(param.to_string(), value.to_string());
            }
            _ => {
                let line = record.position().map(|pos| pos.line() + 1).unwrap_or(0);
                return Err(DiaError::Parse(
                    ErrorInfo::new("settings.short_row", "configuration row is missing a column")
                        .with_context("line", line.to_string())
                        .with_path(path),
                ));
            }
        }
    }
    Ok(RunSettings {
        values,
        source: path.to_path_buf(),
    })
}
