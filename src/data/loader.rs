use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::model::{RecordStore, SightingRecord, YearKey};
use super::states::canonical_state;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Columns that must be present in the header row.
const REQUIRED_COLUMNS: [&str; 3] = ["year", "state", "country"];

/// Load a sightings CSV file.
///
/// Expected header (extra columns are ignored, missing optional ones default
/// to empty):
///
/// ```text
/// datetime,year,city,state,country,shape,durationsec,durationhours,comments,dateposted,latitude,longitude
/// ```
pub fn load_sightings(path: &Path) -> Result<RecordStore> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening sightings file {}", path.display()))?;
    read_sightings(file).with_context(|| format!("reading {}", path.display()))
}

/// Parse sightings from any CSV source.
///
/// Rows the CSV reader cannot decode are counted and skipped.  Rows that
/// decode but lack a usable year, state or country are kept; aggregation
/// decides what to do with them.
pub fn read_sightings<R: Read>(source: R) -> Result<RecordStore> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!("CSV missing '{column}' column");
        }
    }

    let mut records = Vec::new();
    let mut rejected = 0usize;

    for (row_no, result) in reader.deserialize::<RawSighting>().enumerate() {
        match result {
            Ok(raw) => records.push(raw.into_record()),
            Err(e) => {
                log::debug!("skipping CSV row {row_no}: {e}");
                rejected += 1;
            }
        }
    }

    if rejected > 0 {
        log::warn!("{rejected} CSV rows could not be decoded and were skipped");
    }

    Ok(RecordStore::new(records).with_rejected(rejected))
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

/// One CSV row exactly as written; every cell is text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSighting {
    datetime: String,
    year: String,
    city: String,
    state: String,
    country: String,
    shape: String,
    durationsec: String,
    durationhours: String,
    comments: String,
    dateposted: String,
    latitude: String,
    longitude: String,
}

impl RawSighting {
    fn into_record(self) -> SightingRecord {
        SightingRecord {
            year: self.year.parse::<YearKey>().ok(),
            state: canonical_state(&self.state),
            country: self.country.trim().to_ascii_lowercase(),
            shape: self.shape.trim().to_string(),
            latitude: parse_number(&self.latitude),
            longitude: parse_number(&self.longitude),
            duration_seconds: parse_number(&self.durationsec).filter(|d| *d >= 0.0),
            city: self.city,
            comments: self.comments,
            datetime: self.datetime,
            duration_text: self.durationhours,
            date_posted: self.dateposted,
        }
    }
}

/// Finite number from a cell, or `None` for blank / non-numeric text.
fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
