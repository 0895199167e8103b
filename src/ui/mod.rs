//! Concrete views and the panels that host them.
//!
//! Each view implements [`crate::dispatch::View`]: `update` rebuilds the
//! view's private copy of what it draws, and `show` paints that copy every
//! frame.  Views never read each other's state.

use std::collections::BTreeSet;

use crate::data::model::{FilteredAggregate, YearKey};
use crate::dispatch::ViewError;

pub mod area;
pub mod bar;
pub mod map;
pub mod panels;
pub mod pie;
pub mod scatter;
pub mod table;

/// Reject snapshots in which a state key appears twice.
///
/// Views that key marks by state (map shapes, scatter points) would
/// otherwise draw one entry over another.
pub(crate) fn ensure_unique_states(data: &[FilteredAggregate]) -> Result<(), ViewError> {
    let mut seen = BTreeSet::new();
    for entry in data {
        if !seen.insert(entry.state()) {
            return Err(ViewError::DuplicateKey(entry.state().to_string()));
        }
    }
    Ok(())
}

/// The year a snapshot describes; `None` for an empty snapshot.
pub(crate) fn snapshot_year(data: &[FilteredAggregate]) -> Result<Option<YearKey>, ViewError> {
    let Some(first) = data.first().map(|f| f.aggregate.year) else {
        return Ok(None);
    };
    match data.iter().map(|f| f.aggregate.year).find(|y| *y != first) {
        Some(other) => Err(ViewError::MixedYears { first, other }),
        None => Ok(Some(first)),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::entry;
    use super::*;

    #[test]
    fn duplicate_states_are_rejected() {
        let ok = vec![entry("NY", 1, 1.0, false), entry("CA", 1, 1.0, true)];
        assert!(ensure_unique_states(&ok).is_ok());

        let dup = vec![entry("NY", 1, 1.0, false), entry("NY", 2, 1.0, false)];
        assert!(matches!(
            ensure_unique_states(&dup),
            Err(ViewError::DuplicateKey(key)) if key == "NY"
        ));
    }

    #[test]
    fn snapshot_year_requires_one_year() {
        assert_eq!(snapshot_year(&[]).unwrap(), None);

        let mut data = vec![entry("NY", 1, 1.0, false), entry("CA", 1, 1.0, false)];
        assert_eq!(snapshot_year(&data).unwrap(), Some(YearKey(2000)));

        data[1].aggregate.year = YearKey(2001);
        assert!(matches!(
            snapshot_year(&data),
            Err(ViewError::MixedYears { first: YearKey(2000), other: YearKey(2001) })
        ));
    }
}
