use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints, Points, VLine};

use crate::data::model::{FilteredAggregate, RecordStore, YearKey};
use crate::data::rollups::counts_by_year;
use crate::dispatch::{View, ViewError};

// ---------------------------------------------------------------------------
// Area chart: sightings per year
// ---------------------------------------------------------------------------

pub struct AreaView {
    per_year: Vec<(YearKey, usize)>,
    selected: Option<YearKey>,
    /// Sightings in states the brush keeps, for the selected year.
    brushed_total: usize,
}

impl AreaView {
    pub fn new(records: &RecordStore, country: &str) -> Self {
        Self {
            per_year: counts_by_year(records.records(), country),
            selected: None,
            brushed_total: 0,
        }
    }

    pub fn show(&self, ui: &mut Ui) {
        let series: PlotPoints = self
            .per_year
            .iter()
            .map(|(year, n)| [year.value() as f64, *n as f64])
            .collect();

        Plot::new("area_chart")
            .height(ui.available_height().max(80.0))
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .y_axis_label("sightings count")
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(series)
                        .fill(0.0)
                        .color(Color32::from_rgb(0x88, 0x41, 0x9d))
                        .name("sightings"),
                );
                if let Some(year) = self.selected {
                    let x = year.value() as f64;
                    plot_ui.vline(VLine::new(x).color(Color32::from_rgb(0x4d, 0x00, 0x4b)));
                    plot_ui.points(
                        Points::new(vec![[x, self.brushed_total as f64]])
                            .radius(4.0)
                            .color(Color32::from_rgb(0x81, 0x0f, 0x7c))
                            .name("brushed states"),
                    );
                }
            });
    }
}

impl View for AreaView {
    fn name(&self) -> &str {
        "area"
    }

    fn year_selected(&mut self, year: Option<YearKey>) {
        self.selected = year;
    }

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError> {
        super::snapshot_year(data)?;
        self.brushed_total = data
            .iter()
            .filter(|f| !f.filtered)
            .map(|f| f.sighting_count())
            .sum();
        Ok(())
    }
}
