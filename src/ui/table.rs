use std::rc::Rc;

use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{FilteredAggregate, RecordStore, YearKey};
use crate::data::rollups::{rows_for_year, visible_rows};
use crate::data::states::state_name;
use crate::dispatch::{View, ViewError};

// ---------------------------------------------------------------------------
// Sightings table: the year's reports with their comments
// ---------------------------------------------------------------------------

pub struct SightingsTable {
    records: Rc<RecordStore>,
    country: String,
    year: Option<YearKey>,
    /// Target-country rows of `year`.
    year_rows: Vec<usize>,
    /// The subset of `year_rows` the brush keeps.
    rows: Vec<usize>,
}

impl SightingsTable {
    pub fn new(records: Rc<RecordStore>, country: &str) -> Self {
        Self {
            records,
            country: country.to_string(),
            year: None,
            year_rows: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn show(&self, ui: &mut Ui) {
        if self.rows.is_empty() {
            ui.weak("No sightings match the current selection.");
            return;
        }

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::remainder().clip(true))
            .header(20.0, |mut header| {
                for title in ["When", "City", "State", "Shape", "Duration", "Comments"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, self.rows.len(), |mut row| {
                    let r = &self.records.records()[self.rows[row.index()]];
                    row.col(|ui| {
                        let when = ui.label(r.datetime.as_str());
                        if !r.date_posted.is_empty() {
                            when.on_hover_text(format!("posted {}", r.date_posted));
                        }
                    });
                    row.col(|ui| {
                        ui.label(capitalize(&r.city));
                    });
                    row.col(|ui| {
                        ui.label(r.state.as_str())
                            .on_hover_text(state_name(&r.state).unwrap_or(r.state.as_str()));
                    });
                    row.col(|ui| {
                        ui.label(r.shape.as_str());
                    });
                    row.col(|ui| {
                        ui.label(r.duration_text.as_str());
                    });
                    row.col(|ui| {
                        let comments = r.comments_text();
                        ui.label(comments.as_str()).on_hover_text(comments);
                    });
                });
            });
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl View for SightingsTable {
    fn name(&self) -> &str {
        "table"
    }

    fn year_selected(&mut self, year: Option<YearKey>) {
        if year == self.year {
            return;
        }
        self.year = year;
        self.year_rows = match year {
            Some(year) => rows_for_year(self.records.records(), year, &self.country),
            None => Vec::new(),
        };
    }

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError> {
        super::snapshot_year(data)?;
        self.rows = visible_rows(self.records.records(), &self.year_rows, data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::fixtures::{entry, sighting};

    #[test]
    fn rows_follow_year_and_brush() {
        let store = RecordStore::new(vec![
            sighting(2000, "NY", "disk", None),
            sighting(2000, "CA", "oval", None),
            sighting(2001, "NY", "oval", None),
        ]);
        let mut table = SightingsTable::new(Rc::new(store), "us");

        table.year_selected(Some(YearKey(2000)));
        table
            .update(&[entry("NY", 1, 1.0, false), entry("CA", 1, 1.0, true)])
            .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows, vec![0]);

        table.year_selected(Some(YearKey(2001)));
        table.update(&[]).unwrap();
        assert_eq!(table.rows, vec![2]);
    }

    #[test]
    fn year_without_aggregates_still_lists_rows() {
        let store = RecordStore::new(vec![
            sighting(2005, "", "disk", None),
            sighting(2005, "", "oval", None),
        ]);
        let mut table = SightingsTable::new(Rc::new(store), "us");

        table.year_selected(Some(YearKey(2005)));
        table.update(&[]).unwrap();
        assert_eq!(table.len(), 2);

        table.year_selected(None);
        table.update(&[]).unwrap();
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("san marcos"), "San marcos");
        assert_eq!(capitalize(""), "");
    }
}
