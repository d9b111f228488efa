use std::collections::BTreeMap;

use dia_core::{FieldValue, GEN_FIELD};

/// One generation's measurements, keyed by the integer generation index.
///
/// The generation lives outside `fields` so ordering and grouping are always
/// numeric; [`MetricRow::get`] still exposes it under the `gen` column name.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    /// Generation index, the join key.
    pub gen: u64,
    /// Every other column of the row.
    pub fields: BTreeMap<String, FieldValue>,
}

impl MetricRow {
    /// An empty row for generation `gen`.
    pub fn new(gen: u64) -> Self {
        Self {
            gen,
            fields: BTreeMap::new(),
        }
    }

    /// Builder form of [`MetricRow::insert`].
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field; writing the `gen` column is ignored since the key is fixed.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        if name != GEN_FIELD {
            self.fields.insert(name, value.into());
        }
    }

    /// Looks up a column by name; `gen` is answered from the key.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        if name == GEN_FIELD {
            Some(FieldValue::Int(self.gen))
        } else {
            self.fields.get(name).cloned()
        }
    }

    /// Column names present on this row, `gen` included.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(GEN_FIELD).chain(self.fields.keys().map(String::as_str))
    }

    /// Folds `other` into `self`; fields of `other` win on collision.
    pub fn absorb(&mut self, other: MetricRow) {
        debug_assert_eq!(self.gen, other.gen);
        self.fields.extend(other.fields);
    }
}
