use std::collections::BTreeMap;
use std::rc::Rc;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::{FILTERED, ThresholdScale};
use crate::data::geometry::StateShape;
use crate::data::model::{FilteredAggregate, RecordStore, YearKey};
use crate::data::rollups::{filtered_states, rows_for_year};
use crate::dispatch::{View, ViewError};

// ---------------------------------------------------------------------------
// Choropleth map with sighting dots
// ---------------------------------------------------------------------------

/// State outlines coloured by sighting count, plus one dot per sighting.
pub struct MapView {
    records: Rc<RecordStore>,
    shapes: Vec<StateShape>,
    scale: ThresholdScale,
    country: String,
    /// state → (count, filtered) for the current snapshot.
    fills: BTreeMap<String, (usize, bool)>,
    year: Option<YearKey>,
    /// Target-country rows of `year` that have a position.
    year_rows: Vec<usize>,
    /// Row index of each entry of `active_points`.
    active_rows: Vec<usize>,
    active_points: Vec<[f64; 2]>,
    dimmed_points: Vec<[f64; 2]>,
}

/// Screen distance (points) within which a dot counts as hovered.
const HOVER_RADIUS: f64 = 6.0;

impl MapView {
    pub fn new(records: Rc<RecordStore>, shapes: Vec<StateShape>, scale: ThresholdScale, country: &str) -> Self {
        Self {
            records,
            shapes,
            scale,
            country: country.to_string(),
            fills: BTreeMap::new(),
            year: None,
            year_rows: Vec::new(),
            active_rows: Vec::new(),
            active_points: Vec::new(),
            dimmed_points: Vec::new(),
        }
    }

    pub fn set_shapes(&mut self, shapes: Vec<StateShape>) {
        self.shapes = shapes;
    }

    /// Outline colour for a state; states absent from the snapshot are faint.
    fn outline(&self, state: &str) -> Color32 {
        match self.fills.get(state) {
            Some(&(count, filtered)) => self.scale.fill(count, filtered),
            None => FILTERED.gamma_multiply(0.6),
        }
    }

    pub fn show(&self, ui: &mut Ui) {
        if self.shapes.is_empty() && self.active_points.is_empty() && self.dimmed_points.is_empty() {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label("No sightings or boundaries for this year");
            });
            return;
        }

        let mut hovered = None;
        let plot = Plot::new("map")
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .show(ui, |plot_ui| {
                for shape in &self.shapes {
                    let color = self.outline(&shape.state);
                    let width = if self.fills.contains_key(&shape.state) { 2.5 } else { 1.0 };
                    for ring in &shape.rings {
                        let points: PlotPoints = ring.iter().copied().collect();
                        plot_ui.line(Line::new(points).color(color).width(width));
                    }
                    if let Some([x, y]) = shape.label_anchor() {
                        let label = match self.fills.get(&shape.state) {
                            Some((count, _)) => format!("{}\n{count}", shape.state),
                            None => shape.state.clone(),
                        };
                        plot_ui.text(Text::new(PlotPoint::new(x, y), RichText::new(label).size(9.0)));
                    }
                }

                if !self.dimmed_points.is_empty() {
                    let points: PlotPoints = self.dimmed_points.iter().copied().collect();
                    plot_ui.points(Points::new(points).radius(1.5).color(FILTERED).name("brushed out"));
                }
                if !self.active_points.is_empty() {
                    let points: PlotPoints = self.active_points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(2.0)
                            .color(Color32::from_rgb(0x4d, 0x00, 0x4b))
                            .name("sightings"),
                    );
                }

                if let Some(pointer) = plot_ui.pointer_coordinate() {
                    let transform = plot_ui.transform();
                    let screen = |x: f64, y: f64| {
                        let pos = transform.position_from_point(&PlotPoint::new(x, y));
                        [pos.x as f64, pos.y as f64]
                    };
                    let target = screen(pointer.x, pointer.y);
                    hovered = nearest_dot(self.active_points.iter().map(|p| screen(p[0], p[1])), target, HOVER_RADIUS);
                }
            });

        if let Some(i) = hovered {
            let record = &self.records.records()[self.active_rows[i]];
            plot.response.on_hover_ui_at_pointer(|ui: &mut Ui| {
                ui.strong(format!("{}, {}", record.city, record.state));
                ui.label(format!("{} · {}", record.shape, record.datetime));
                if !record.duration_text.is_empty() {
                    ui.label(record.duration_text.as_str());
                }
                ui.separator();
                ui.label(record.comments_text());
            });
        }
    }
}

/// Index of the dot closest to `target`, if any lies within `radius`.
fn nearest_dot(dots: impl IntoIterator<Item = [f64; 2]>, target: [f64; 2], radius: f64) -> Option<usize> {
    dots.into_iter()
        .enumerate()
        .map(|(i, [x, y])| (i, (x - target[0]).hypot(y - target[1])))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

impl View for MapView {
    fn name(&self) -> &str {
        "map"
    }

    fn year_selected(&mut self, year: Option<YearKey>) {
        if year == self.year {
            return;
        }
        self.year = year;
        let records = self.records.records();
        self.year_rows = match year {
            Some(year) => rows_for_year(records, year, &self.country)
                .into_iter()
                .filter(|&i| records[i].position().is_some())
                .collect(),
            None => Vec::new(),
        };
    }

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError> {
        super::ensure_unique_states(data)?;
        super::snapshot_year(data)?;

        self.fills = data
            .iter()
            .map(|f| (f.state().to_string(), (f.sighting_count(), f.filtered)))
            .collect();

        self.active_rows.clear();
        self.active_points.clear();
        self.dimmed_points.clear();
        let records = self.records.records();
        let hidden = filtered_states(data);
        for &i in &self.year_rows {
            let record = &records[i];
            let Some(pos) = record.position() else {
                continue;
            };
            if hidden.contains(record.state.as_str()) {
                self.dimmed_points.push(pos);
            } else {
                self.active_rows.push(i);
                self.active_points.push(pos);
            }
        }
        Ok(())
    }
}
