use std::path::{Path, PathBuf};

use dia_core::errors::{DiaError, ErrorInfo};
use serde::Serialize;
use walkdir::WalkDir;

/// A discovered run directory and the seed parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunDir {
    /// Run directory path as found under its data root.
    pub path: PathBuf,
    /// Seed parsed from the directory name.
    pub seed: u64,
}

impl RunDir {
    /// Path rendered for progress lines and the `directory` column.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fails when any data root is absent, listing which roots could be found.
pub fn check_roots(roots: &[PathBuf]) -> Result<(), DiaError> {
    if roots.iter().all(|root| root.exists()) {
        return Ok(());
    }
    let info = roots.iter().fold(
        ErrorInfo::new(
            "discovery.missing_root",
            "Unable to locate all data directories",
        ),
        |info, root| {
            let state = if root.exists() { "found" } else { "missing" };
            info.with_context(root.display().to_string(), state)
        },
    );
    Err(DiaError::MissingInput(info))
}

/// Parses the seed from the token after the final underscore of a run name.
pub fn parse_seed(path: &Path) -> Result<u64, DiaError> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.rsplit_once('_')
        .and_then(|(_, token)| token.parse::<u64>().ok())
        .ok_or_else(|| {
            DiaError::Parse(
                ErrorInfo::new("discovery.seed", "run directory name has no numeric seed suffix")
                    .with_path(path)
                    .with_hint("run directories are expected to end in `_<seed>`"),
            )
        })
}

/// Lists the immediate subdirectories of every root whose name contains
/// `marker`, ordered by seed.
pub fn discover_runs(roots: &[PathBuf], marker: &str) -> Result<Vec<RunDir>, DiaError> {
    check_roots(roots)?;
    let mut runs = Vec::new();
    for root in roots {
        let entries = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in entries {
            let entry = entry.map_err(|err| DiaError::io("discovery.read_dir", root, err))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            if !entry.file_name().to_string_lossy().contains(marker) {
                continue;
            }
            let path = entry.into_path();
            let seed = parse_seed(&path)?;
            runs.push(RunDir { path, seed });
        }
    }
    runs.sort_by_key(|run| run.seed);
    Ok(runs)
}
