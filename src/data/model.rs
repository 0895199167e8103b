use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// YearKey – normalized year used for grouping and selection
// ---------------------------------------------------------------------------

/// A calendar year.
///
/// Raw input carries years as text (`"2000"`, `" 2000 "`, `"2000.0"`) while the
/// slider produces integers.  Both sides are normalized into this type before
/// any comparison, so `"2000"` and `2000` always select the same group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearKey(pub i32);

impl YearKey {
    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for YearKey {
    fn from(year: i32) -> Self {
        YearKey(year)
    }
}

/// Error returned when a year string cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid year: '{0}'")]
pub struct ParseYearError(pub String);

impl FromStr for YearKey {
    type Err = ParseYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(year) = trimmed.parse::<i32>() {
            return Ok(YearKey(year));
        }
        // Spreadsheet exports sometimes write integral years as floats.
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
                Ok(YearKey(f as i32))
            }
            _ => Err(ParseYearError(s.to_string())),
        }
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SightingRecord – one row of the input dataset
// ---------------------------------------------------------------------------

/// A single sighting report.
///
/// Optional fields stay `None` when the source cell is empty or unparseable;
/// such rows are kept for raw point rendering but may be excluded from
/// aggregation (see [`SightingRecord::is_aggregatable`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SightingRecord {
    pub year: Option<YearKey>,
    /// Canonical two-letter state code, or empty when the source had none.
    pub state: String,
    /// Lowercase country code (`"us"`, `"ca"`, ...), empty when unknown.
    pub country: String,
    pub shape: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Reported duration in seconds; never negative.
    pub duration_seconds: Option<f64>,
    pub city: String,
    pub comments: String,
    pub datetime: String,
    pub duration_text: String,
    pub date_posted: String,
}

impl SightingRecord {
    /// Whether the row carries every key required for per-state aggregation.
    pub fn is_aggregatable(&self) -> bool {
        self.year.is_some() && !self.state.is_empty() && !self.country.is_empty()
    }

    /// Longitude/latitude pair, when both are present.
    pub fn position(&self) -> Option<[f64; 2]> {
        Some([self.longitude?, self.latitude?])
    }

    /// Comments with the dump's numeric entities for `,` `'` `!` decoded.
    pub fn comments_text(&self) -> String {
        self.comments
            .replace("&#44", ",")
            .replace("&#39", "'")
            .replace("&#33", "!")
    }
}

// ---------------------------------------------------------------------------
// RecordStore – immutable dataset shared by every consumer
// ---------------------------------------------------------------------------

/// The loaded dataset.  Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<SightingRecord>,
    /// Rows dropped by the loader because they could not be parsed at all.
    rejected_rows: usize,
}

impl RecordStore {
    pub fn new(records: Vec<SightingRecord>) -> Self {
        Self {
            records,
            rejected_rows: 0,
        }
    }

    pub(crate) fn with_rejected(mut self, rejected_rows: usize) -> Self {
        self.rejected_rows = rejected_rows;
        self
    }

    pub fn records(&self) -> &[SightingRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }

    /// Records that would be skipped by aggregation.
    pub fn excluded_from_aggregation(&self) -> usize {
        self.records.iter().filter(|r| !r.is_aggregatable()).count()
    }

    /// Smallest and largest year present, if any record has a year.
    pub fn year_range(&self) -> Option<(YearKey, YearKey)> {
        let mut years = self.records.iter().filter_map(|r| r.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Per-`(year, state)` summary.
#[derive(Debug, Clone, PartialEq)]
pub struct StateYearAggregate {
    pub year: YearKey,
    /// Canonical state code; the join key shared with the map geometry.
    pub state: String,
    /// Always at least 1.
    pub sighting_count: usize,
    /// `NaN` when no record in the group carried a numeric duration.
    pub avg_duration_seconds: f64,
}

impl StateYearAggregate {
    /// Whether the average duration can take part in numeric comparisons.
    pub fn has_comparable_duration(&self) -> bool {
        !self.avg_duration_seconds.is_nan()
    }
}

/// An aggregate annotated with the current brush result.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredAggregate {
    pub aggregate: StateYearAggregate,
    /// `true` when the aggregate lies outside the active brush.
    pub filtered: bool,
}

impl FilteredAggregate {
    pub fn state(&self) -> &str {
        &self.aggregate.state
    }

    pub fn sighting_count(&self) -> usize {
        self.aggregate.sighting_count
    }

    pub fn avg_duration_seconds(&self) -> f64 {
        self.aggregate.avg_duration_seconds
    }
}
