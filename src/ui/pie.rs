use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};

use crate::color::generate_palette;
use crate::data::aggregate::group_by;
use crate::data::model::{FilteredAggregate, RecordStore, YearKey};
use crate::data::rollups::{SHAPES, counts_by_shape, filtered_states, rows_for_year};
use crate::dispatch::{View, ViewError};

// ---------------------------------------------------------------------------
// Donut chart: reported shapes among the brushed sightings of the year
// ---------------------------------------------------------------------------

pub struct PieView {
    records: Rc<RecordStore>,
    country: String,
    colors: Vec<Color32>,
    year: Option<YearKey>,
    /// Shape counts per state for `year`, in [`SHAPES`] order.
    by_state: BTreeMap<String, Vec<usize>>,
    counts: Vec<(&'static str, usize)>,
}

impl PieView {
    pub fn new(records: Rc<RecordStore>, country: &str) -> Self {
        Self {
            records,
            country: country.to_string(),
            colors: generate_palette(SHAPES.len()),
            year: None,
            by_state: BTreeMap::new(),
            counts: SHAPES.iter().map(|s| (*s, 0)).collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Shape under a polar angle measured clockwise from 12 o'clock.
    fn wedge_at(&self, angle: f32) -> Option<(&'static str, usize)> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut start = 0.0;
        for &(label, count) in &self.counts {
            let sweep = count as f32 / total as f32 * TAU;
            if count > 0 && angle >= start && angle < start + sweep {
                return Some((label, count));
            }
            start += sweep;
        }
        None
    }

    pub fn show(&self, ui: &mut Ui) {
        let side = ui.available_width().clamp(120.0, 260.0);
        let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
        let center = response.rect.center();
        let outer = side / 2.0 - 10.0;
        let inner = outer * 0.3;

        let total = self.total();
        if total == 0 {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "no sightings",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let polar = |r: f32, a: f32| Pos2::new(center.x + r * (a - FRAC_PI_2).cos(), center.y + r * (a - FRAC_PI_2).sin());

        let mut start = 0.0f32;
        for (i, &(_, count)) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let sweep = count as f32 / total as f32 * TAU;
            // Thin convex slices approximate the annular wedge.
            let steps = (sweep / 0.05).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![polar(inner, a0), polar(outer, a0), polar(outer, a1), polar(inner, a1)],
                    self.colors[i],
                    Stroke::NONE,
                ));
            }
            start += sweep;
        }

        if let Some(pos) = response.hover_pos() {
            let d = pos - center;
            let r = d.length();
            if r >= inner && r <= outer {
                let angle = (d.y.atan2(d.x) + FRAC_PI_2).rem_euclid(TAU);
                if let Some((label, count)) = self.wedge_at(angle) {
                    let percent = (1000.0 * count as f64 / total as f64).round() / 10.0;
                    response.on_hover_text_at_pointer(format!(
                        "{}\n{count}\n{percent}%",
                        label.to_uppercase()
                    ));
                }
            }
        }
    }

    /// Two-column legend of the non-zero shapes.
    pub fn legend(&self, ui: &mut Ui) {
        egui::Grid::new("pie_legend").num_columns(2).show(ui, |ui: &mut Ui| {
            for (i, &(label, count)) in self.counts.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                ui.colored_label(self.colors[i], label);
                ui.label(count.to_string());
                ui.end_row();
            }
        });
    }
}

impl View for PieView {
    fn name(&self) -> &str {
        "pie"
    }

    fn year_selected(&mut self, year: Option<YearKey>) {
        if year == self.year {
            return;
        }
        self.year = year;
        self.by_state.clear();
        let Some(year) = year else {
            return;
        };
        let records = self.records.records();
        let rows = rows_for_year(records, year, &self.country);
        for (state, group) in group_by(rows.iter().map(|&i| &records[i]), |r| r.state.clone()) {
            let counts = counts_by_shape(group).into_iter().map(|(_, n)| n).collect();
            self.by_state.insert(state, counts);
        }
    }

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError> {
        super::snapshot_year(data)?;
        let hidden = filtered_states(data);
        let mut totals = vec![0; SHAPES.len()];
        for (state, counts) in &self.by_state {
            if hidden.contains(state.as_str()) {
                continue;
            }
            for (total, n) in totals.iter_mut().zip(counts) {
                *total += n;
            }
        }
        self.counts = SHAPES.iter().copied().zip(totals).collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::fixtures::{entry, sighting};

    fn view() -> PieView {
        let store = RecordStore::new(vec![
            sighting(2000, "NY", "disk", None),
            sighting(2000, "NY", "light", None),
            sighting(2000, "CA", "light", None),
            sighting(1999, "CA", "oval", None),
        ]);
        PieView::new(Rc::new(store), "us")
    }

    #[test]
    fn counts_follow_the_brush() {
        let mut pie = view();
        pie.year_selected(Some(YearKey(2000)));
        pie.update(&[entry("NY", 2, 1.0, false), entry("CA", 1, 1.0, false)])
            .unwrap();
        assert_eq!(pie.total(), 3);

        pie.update(&[entry("NY", 2, 1.0, false), entry("CA", 1, 1.0, true)])
            .unwrap();
        assert_eq!(pie.total(), 2);
        assert!(pie.counts.contains(&("light", 1)));
        assert!(pie.counts.contains(&("disk", 1)));
    }

    #[test]
    fn empty_year_is_all_zero() {
        let mut pie = view();
        pie.year_selected(Some(YearKey(1899)));
        pie.update(&[]).unwrap();
        assert_eq!(pie.total(), 0);
        assert_eq!(pie.counts.len(), SHAPES.len());
        assert_eq!(pie.wedge_at(1.0), None);
    }

    #[test]
    fn wedges_follow_display_order() {
        let mut pie = view();
        pie.year_selected(Some(YearKey(2000)));
        pie.update(&[entry("NY", 2, 1.0, false), entry("CA", 1, 1.0, false)])
            .unwrap();
        // "disk" precedes "light": one third, then two thirds of the circle.
        assert_eq!(pie.wedge_at(0.1), Some(("disk", 1)));
        assert_eq!(pie.wedge_at(TAU * 0.5), Some(("light", 2)));
    }

    #[test]
    fn year_of_blank_states_still_counts() {
        let store = RecordStore::new(vec![
            sighting(2005, "", "disk", None),
            sighting(2005, "", "oval", None),
            sighting(2000, "NY", "disk", None),
        ]);
        let mut pie = PieView::new(Rc::new(store), "us");

        // No row of 2005 can be aggregated, so the snapshot is empty.
        pie.year_selected(Some(YearKey(2005)));
        pie.update(&[]).unwrap();
        assert_eq!(pie.total(), 2);
        assert!(pie.counts.contains(&("oval", 1)));
    }
}
