#![deny(missing_docs)]
#![doc = "Core error, value and selection-scheme types for the Dia experiment aggregator."]

pub mod errors;
pub mod selection;
pub mod value;

pub use errors::{DiaError, ErrorInfo};
pub use selection::SelectionScheme;
pub use value::{format_float, FieldValue};

/// Column holding the generation index, the join key across metric files.
pub const GEN_FIELD: &str = "gen";
