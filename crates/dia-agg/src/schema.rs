use std::collections::BTreeSet;
use std::path::Path;

use dia_core::errors::{DiaError, ErrorInfo};

use crate::config::AggregateConfig;
use crate::row::MetricRow;
use crate::settings::RunSettings;

/// Output columns contributed by one run: data fields plus configuration
/// parameters, exclusions already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSchema {
    data_fields: BTreeSet<String>,
    config_fields: BTreeSet<String>,
}

impl RunSchema {
    /// Data fields come from the run's first merged row.
    pub fn new(
        first_row: Option<&MetricRow>,
        settings: &RunSettings,
        config: &AggregateConfig,
    ) -> Self {
        let data_fields = first_row
            .into_iter()
            .flat_map(|row| row.field_names())
            .filter(|name| !config.data_field_exclude.contains(*name))
            .map(String::from)
            .collect();
        let config_fields = settings
            .keys()
            .filter(|name| !config.config_exclude.contains(*name))
            .map(String::from)
            .collect();
        Self {
            data_fields,
            config_fields,
        }
    }

    /// Sorted union of data and configuration field names.
    pub fn header(&self) -> Vec<String> {
        self.data_fields
            .union(&self.config_fields)
            .cloned()
            .collect()
    }

    /// Header joined with commas, used to compare runs.
    pub fn header_line(&self) -> String {
        self.header().join(",")
    }

    /// Renders `row` in header order. Configuration values take precedence
    /// over a data field of the same name; absent data fields are empty.
    pub fn render(&self, row: &MetricRow, settings: &RunSettings) -> Vec<String> {
        self.data_fields
            .union(&self.config_fields)
            .map(|field| {
                if self.config_fields.contains(field) {
                    settings.get(field).unwrap_or_default().to_string()
                } else {
                    row.get(field).map(|value| value.to_string()).unwrap_or_default()
                }
            })
            .collect()
    }
}

/// Collects run headers and rejects any run that disagrees with the others.
#[derive(Debug, Default)]
pub struct SchemaValidator {
    headers: BTreeSet<String>,
    agreed: Option<Vec<String>>,
}

impl SchemaValidator {
    /// A validator that has admitted no runs yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the schema of `run`, failing when it differs from earlier runs.
    pub fn admit(&mut self, run: &Path, schema: &RunSchema) -> Result<(), DiaError> {
        let line = schema.header_line();
        self.headers.insert(line.clone());
        if self.headers.len() > 1 {
            let expected = self.agreed.as_ref().map(|h| h.join(",")).unwrap_or_default();
            return Err(DiaError::Schema(
                ErrorInfo::new("schema.mismatch", "Header mismatch!")
                    .with_path(run)
                    .with_context("expected", expected)
                    .with_context("found", line)
                    .with_hint("all runs must share the same data and configuration fields"),
            ));
        }
        if self.agreed.is_none() {
            self.agreed = Some(schema.header());
        }
        Ok(())
    }

    /// The single header every admitted run agreed on.
    pub fn agreed_header(&self) -> Option<&[String]> {
        self.agreed.as_deref()
    }
}
