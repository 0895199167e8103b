use std::collections::BTreeMap;

use super::model::{SightingRecord, StateYearAggregate, YearKey};

// ---------------------------------------------------------------------------
// Generic grouping primitive
// ---------------------------------------------------------------------------

/// Group borrowed items by a key.
///
/// Groups come back ordered by key and each group keeps the input order of
/// its items, so the result is a pure function of the input sequence.
pub fn group_by<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> BTreeMap<K, Vec<&'a T>>
where
    T: 'a,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

// ---------------------------------------------------------------------------
// Aggregation engine
// ---------------------------------------------------------------------------

/// Per-state aggregates for one year.
///
/// Rows without a year, state or country are skipped.  The usable rows are
/// grouped by year, then the requested year's rows by state; the result is
/// ordered by state code.  A year that matches nothing yields an empty vector.
pub fn aggregate(records: &[SightingRecord], year: YearKey) -> Vec<StateYearAggregate> {
    let usable = records.iter().filter(|r| r.is_aggregatable());
    let mut by_year = group_by(usable, |r| r.year);
    let Some(rows) = by_year.remove(&Some(year)) else {
        return Vec::new();
    };

    group_by(rows, |r| r.state.clone())
        .into_iter()
        .map(|(state, group)| summarize(year, state, &group))
        .collect()
}

/// Count and mean duration for one non-empty group.
///
/// Missing durations contribute nothing to the sum but still count as
/// sightings.  With no numeric duration at all the mean is `NaN`.
fn summarize(year: YearKey, state: String, group: &[&SightingRecord]) -> StateYearAggregate {
    let sighting_count = group.len();
    let durations: Vec<f64> = group.iter().filter_map(|r| r.duration_seconds).collect();

    let avg_duration_seconds = if durations.is_empty() {
        f64::NAN
    } else {
        durations.iter().sum::<f64>() / sighting_count as f64
    };

    StateYearAggregate {
        year,
        state,
        sighting_count,
        avg_duration_seconds,
    }
}
