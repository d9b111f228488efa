use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use dia_core::errors::{DiaError, ErrorInfo};

/// The combined time series: one header shared by every row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateTable {
    /// Column names, written as the first line.
    pub header: Vec<String>,
    /// Data rows, each aligned with `header`.
    pub rows: Vec<Vec<String>>,
}

/// Writes `table` to `path`, creating parent directories first.
pub fn write_table(table: &AggregateTable, path: &Path) -> Result<(), DiaError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| DiaError::io("writer.create_dir", parent, err))?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| wrap_csv("writer.open", path, err))?;
    writer
        .write_record(&table.header)
        .map_err(|err| wrap_csv("writer.header", path, err))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|err| wrap_csv("writer.row", path, err))?;
    }
    writer
        .flush()
        .map_err(|err| DiaError::io("writer.flush", path, err))?;
    Ok(())
}

fn wrap_csv(code: &str, path: &Path, err: csv::Error) -> DiaError {
    DiaError::Io(
        ErrorInfo::new(code, "failed to write aggregate CSV")
            .with_path(path)
            .with_hint(err.to_string()),
    )
}
