use std::collections::{BTreeMap, BTreeSet};

use super::aggregate::group_by;
use super::model::{FilteredAggregate, SightingRecord, YearKey};

// ---------------------------------------------------------------------------
// Secondary rollups feeding the non-scatter views
// ---------------------------------------------------------------------------

/// Shape labels shown by the pie chart, in display order.
pub const SHAPES: [&str; 19] = [
    "changing",
    "chevron",
    "cigar",
    "cross",
    "cylinder",
    "diamond",
    "disk",
    "fireball",
    "formation",
    "oval",
    "pyramid",
    "rectangle",
    "round",
    "square",
    "sphere",
    "triangle",
    "other",
    "unknown",
    "light",
];

/// Sightings per year for one country, ordered by year.
pub fn counts_by_year(records: &[SightingRecord], country: &str) -> Vec<(YearKey, usize)> {
    let in_country = records.iter().filter(|r| r.country == country);
    group_by(in_country, |r| r.year)
        .into_iter()
        .filter_map(|(year, rows)| Some((year?, rows.len())))
        .collect()
}

/// Sightings per state code for one country across all years, ordered by code.
pub fn counts_by_state(records: &[SightingRecord], country: &str) -> Vec<(String, usize)> {
    let in_country = records
        .iter()
        .filter(|r| r.country == country && !r.state.is_empty());
    group_by(in_country, |r| r.state.clone())
        .into_iter()
        .map(|(state, rows)| (state, rows.len()))
        .collect()
}

/// Counts over [`SHAPES`], zeros included.  Unlisted shapes are ignored.
pub fn counts_by_shape<'a>(records: impl IntoIterator<Item = &'a SightingRecord>) -> Vec<(&'static str, usize)> {
    let mut counts: BTreeMap<&'static str, usize> = SHAPES.iter().map(|s| (*s, 0)).collect();
    for record in records {
        let shape = record.shape.trim().to_ascii_lowercase();
        if let Some(label) = SHAPES.iter().find(|s| **s == shape) {
            *counts.entry(*label).or_default() += 1;
        }
    }
    SHAPES.iter().map(|s| (*s, counts[s])).collect()
}

/// Indices of the raw rows for one year and country, in input order.
///
/// Unlike aggregation this keeps rows with a blank state.
pub fn rows_for_year(records: &[SightingRecord], year: YearKey, country: &str) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.year == Some(year) && r.country == country)
        .map(|(i, _)| i)
        .collect()
}

/// Minimum and maximum of the finite values, or `None` when there are none.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// States the brush excludes in a snapshot.
pub fn filtered_states(data: &[FilteredAggregate]) -> BTreeSet<&str> {
    data.iter().filter(|f| f.filtered).map(|f| f.state()).collect()
}

/// The subset of `rows` (indices into `records`) that survives the brush.
///
/// A row is hidden only when its state is marked filtered; rows with a blank
/// state, or whose state has no aggregate, always stay.
pub fn visible_rows(records: &[SightingRecord], rows: &[usize], data: &[FilteredAggregate]) -> Vec<usize> {
    let hidden = filtered_states(data);
    rows.iter()
        .copied()
        .filter(|&i| !hidden.contains(records[i].state.as_str()))
        .collect()
}
