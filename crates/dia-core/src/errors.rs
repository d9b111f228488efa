//! Structured error types shared across the Dia crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`DiaError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, parameter names, values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds a `path` context entry rendered from a filesystem path.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the aggregator.
///
/// Every failure in the pipeline is fatal; the variant names the family so the
/// binary can report it, while [`ErrorInfo`] carries the offending path or value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum DiaError {
    /// Invalid invocation or configuration values.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// A required directory, file or setting is absent.
    #[error("missing input: {0}")]
    MissingInput(ErrorInfo),
    /// Runs disagree on the output column set.
    #[error("schema conflict: {0}")]
    Schema(ErrorInfo),
    /// A run names a selection scheme code with no known decoding.
    #[error("unknown selection scheme: {0}")]
    Selection(ErrorInfo),
    /// Malformed CSV content or unparsable values.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Filesystem failures while reading inputs or writing outputs.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl DiaError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            DiaError::Config(info)
            | DiaError::MissingInput(info)
            | DiaError::Schema(info)
            | DiaError::Selection(info)
            | DiaError::Parse(info)
            | DiaError::Io(info) => info,
        }
    }

    /// Wraps an I/O failure on `path` into an [`DiaError::Io`].
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        DiaError::Io(ErrorInfo::new(code, err.to_string()).with_path(path))
    }
}
