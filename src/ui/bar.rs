use std::collections::BTreeSet;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::FILTERED;
use crate::data::model::{FilteredAggregate, RecordStore};
use crate::data::rollups::{counts_by_state, filtered_states};
use crate::dispatch::{View, ViewError};

// ---------------------------------------------------------------------------
// Bar chart: all-time sightings per state
// ---------------------------------------------------------------------------

const BAR_COLOR: Color32 = Color32::from_rgb(0x88, 0x41, 0x9d);

/// All-time totals per state; states the brush excludes in the selected
/// year are greyed.
pub struct BarView {
    totals: Vec<(String, usize)>,
    hidden: BTreeSet<String>,
}

impl BarView {
    pub fn new(records: &RecordStore, country: &str) -> Self {
        Self {
            totals: counts_by_state(records.records(), country),
            hidden: BTreeSet::new(),
        }
    }

    pub fn show(&self, ui: &mut Ui) {
        let bars: Vec<Bar> = self
            .totals
            .iter()
            .enumerate()
            .map(|(i, (state, count))| {
                let fill = if self.hidden.contains(state) {
                    FILTERED
                } else {
                    BAR_COLOR
                };
                Bar::new(i as f64, *count as f64)
                    .width(0.8)
                    .name(state)
                    .fill(fill)
            })
            .collect();

        let labels: Vec<String> = self.totals.iter().map(|(s, _)| s.clone()).collect();
        Plot::new("bar_chart")
            .height(ui.available_height().max(80.0))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_grid(false)
            .y_axis_label("sightings")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("sightings by state"));
            });
    }
}

impl View for BarView {
    fn name(&self) -> &str {
        "bar"
    }

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError> {
        self.hidden = filtered_states(data).into_iter().map(str::to_string).collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::fixtures::{entry, sighting};

    #[test]
    fn totals_ignore_the_year_and_brush_greys() {
        let store = RecordStore::new(vec![
            sighting(2000, "NY", "disk", None),
            sighting(1990, "NY", "disk", None),
            sighting(2000, "AZ", "disk", None),
        ]);
        let mut bar = BarView::new(&store, "us");
        assert_eq!(bar.totals, vec![("AZ".to_string(), 1), ("NY".to_string(), 2)]);

        bar.update(&[entry("NY", 1, 1.0, true), entry("AZ", 1, 1.0, false)])
            .unwrap();
        assert!(bar.hidden.contains("NY"));
        assert!(!bar.hidden.contains("AZ"));

        bar.update(&[]).unwrap();
        assert!(bar.hidden.is_empty());
    }
}
