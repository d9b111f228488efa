use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::row::MetricRow;

/// Outer-joins metric rows on their generation.
///
/// Rows are folded in input order, so when several sources define the same
/// column for a generation the later source wins. The result holds exactly one
/// row per distinct generation, in ascending numeric order.
pub fn merge_rows<I>(rows: I) -> Vec<MetricRow>
where
    I: IntoIterator<Item = MetricRow>,
{
    let mut merged: BTreeMap<u64, MetricRow> = BTreeMap::new();
    for row in rows {
        match merged.entry(row.gen) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(row),
        }
    }
    merged.into_values().collect()
}
