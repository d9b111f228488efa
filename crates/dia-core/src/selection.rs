//! Selection scheme codes recorded in run configurations.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{DiaError, ErrorInfo};

/// Parent selection algorithm used by a run, decoded from the integer
/// `SELECTION` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SelectionScheme {
    /// Code 0.
    MuLambda,
    /// Code 1.
    Tournament,
    /// Code 2.
    FitnessSharing,
    /// Code 3.
    NoveltySearch,
    /// Code 4.
    EpsilonLexicase,
    /// Code 5. Evaluates a random subset of tests each generation.
    DownSampledLexicase,
    /// Code 6. Partitions the population and tests into cohorts.
    CohortLexicase,
    /// Code 7.
    NoveltyLexicase,
    /// Code 8.
    EcoEa,
}

impl SelectionScheme {
    /// Every scheme in code order.
    pub const ALL: [SelectionScheme; 9] = [
        SelectionScheme::MuLambda,
        SelectionScheme::Tournament,
        SelectionScheme::FitnessSharing,
        SelectionScheme::NoveltySearch,
        SelectionScheme::EpsilonLexicase,
        SelectionScheme::DownSampledLexicase,
        SelectionScheme::CohortLexicase,
        SelectionScheme::NoveltyLexicase,
        SelectionScheme::EcoEa,
    ];

    /// Returns the integer code stored in run configurations.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Returns the name written to the `selection_name` column.
    pub fn name(self) -> &'static str {
        match self {
            SelectionScheme::MuLambda => "MuLambda",
            SelectionScheme::Tournament => "Tournament",
            SelectionScheme::FitnessSharing => "FitnessSharing",
            SelectionScheme::NoveltySearch => "NoveltySearch",
            SelectionScheme::EpsilonLexicase => "EpsilonLexicase",
            SelectionScheme::DownSampledLexicase => "DownSampledLexicase",
            SelectionScheme::CohortLexicase => "CohortLexicase",
            SelectionScheme::NoveltyLexicase => "NoveltyLexicase",
            SelectionScheme::EcoEa => "EcoEa",
        }
    }

    /// Decodes the raw `SELECTION` setting.
    pub fn from_code(raw: &str) -> Result<Self, DiaError> {
        raw.trim()
            .parse::<usize>()
            .ok()
            .and_then(|code| Self::ALL.get(code).copied())
            .ok_or_else(|| {
                DiaError::Selection(
                    ErrorInfo::new("selection.unknown_code", "unrecognised selection scheme code")
                        .with_context("code", raw)
                        .with_hint(format!("known codes are 0..={}", Self::ALL.len() - 1)),
                )
            })
    }

    /// Returns the configuration key holding the test sampling proportion for
    /// schemes that evaluate only part of the test set.
    pub fn sample_prop_key(self) -> Option<&'static str> {
        match self {
            SelectionScheme::DownSampledLexicase => Some("DSLEX_PROP"),
            SelectionScheme::CohortLexicase => Some("COH_LEX_PROP"),
            _ => None,
        }
    }
}

impl Display for SelectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
