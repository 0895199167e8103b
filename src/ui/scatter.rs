use eframe::egui::{Color32, Pos2, Rect, Stroke, Ui};
use egui_plot::{Plot, PlotBounds, PlotPoints, Points, Polygon};

use crate::color::{FILTERED, ThresholdScale};
use crate::data::filter::{AxisScale, BrushController, FilterPredicate, PixelRect};
use crate::data::model::FilteredAggregate;
use crate::data::rollups::extent;
use crate::dispatch::{View, ViewError};

// ---------------------------------------------------------------------------
// Scatter plot: average duration × sighting count, with a rectangular brush
// ---------------------------------------------------------------------------

/// A brush gesture together with the scales it was drawn against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushEvent {
    pub controller: BrushController,
    /// `None` is the cleared signal (a click without a drag).
    pub selection: Option<PixelRect>,
}

#[derive(Debug, Clone, PartialEq)]
struct ScatterPoint {
    state: String,
    x: f64,
    y: f64,
    count: usize,
    filtered: bool,
}

/// One point per state; the brush source for the whole display.
pub struct ScatterView {
    scale: ThresholdScale,
    points: Vec<ScatterPoint>,
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    drag_origin: Option<Pos2>,
    selection: Option<Rect>,
}

impl ScatterView {
    pub fn new(scale: ThresholdScale) -> Self {
        Self {
            scale,
            points: Vec::new(),
            x_domain: (0.0, 1.0),
            y_domain: (0.0, 1.0),
            drag_origin: None,
            selection: None,
        }
    }

    /// Forget the on-screen brush rectangle, e.g. after an external clear.
    pub fn reset_brush(&mut self, predicate: FilterPredicate) {
        if predicate.is_cleared() {
            self.selection = None;
            self.drag_origin = None;
        }
    }

    /// Draw the plot and translate pointer drags into brush events.
    pub fn show(&mut self, ui: &mut Ui) -> Option<BrushEvent> {
        let (x0, x1) = self.x_domain;
        let (y0, y1) = self.y_domain;

        let response = Plot::new("scatter")
            .x_axis_label("average duration (seconds)")
            .y_axis_label("# of sightings")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));

                // Colour bands behind the points mirror the map legend.
                let mut edges = vec![y0];
                edges.extend(self.scale.thresholds().iter().copied().filter(|t| *t > y0 && *t < y1));
                edges.push(y1);
                for pair in edges.windows(2) {
                    let (lo, hi) = (pair[0], pair[1]);
                    let band: PlotPoints = vec![[x0, lo], [x1, lo], [x1, hi], [x0, hi]].into();
                    plot_ui.polygon(
                        Polygon::new(band)
                            .fill_color(self.scale.color_for(lo).gamma_multiply(0.15))
                            .stroke(Stroke::NONE),
                    );
                }

                for p in &self.points {
                    let (radius, color) = if p.filtered {
                        (3.0, FILTERED)
                    } else {
                        (4.5, self.scale.color_for(p.count as f64))
                    };
                    plot_ui.points(
                        Points::new(vec![[p.x, p.y]])
                            .radius(radius)
                            .color(color)
                            .name(&p.state),
                    );
                }
            });

        let frame = *response.transform.frame();
        let bounds = response.transform.bounds();
        let controller = BrushController::new(
            AxisScale::linear(
                (bounds.min()[0], bounds.max()[0]),
                (frame.left() as f64, frame.right() as f64),
            ),
            AxisScale::linear(
                (bounds.min()[1], bounds.max()[1]),
                (frame.bottom() as f64, frame.top() as f64),
            ),
        );

        let r = &response.response;
        let mut event = None;
        if r.drag_started() {
            self.drag_origin = r.interact_pointer_pos();
        }
        if r.dragged() {
            if let (Some(origin), Some(pos)) = (self.drag_origin, r.interact_pointer_pos()) {
                let rect = Rect::from_two_pos(origin, pos).intersect(frame);
                self.selection = Some(rect);
                event = Some(BrushEvent {
                    controller,
                    selection: Some(PixelRect {
                        x0: rect.left() as f64,
                        y0: rect.top() as f64,
                        x1: rect.right() as f64,
                        y1: rect.bottom() as f64,
                    }),
                });
            }
        }
        if r.drag_stopped() {
            self.drag_origin = None;
        }
        if r.clicked() {
            self.selection = None;
            event = Some(BrushEvent {
                controller,
                selection: None,
            });
        }

        if let Some(rect) = self.selection {
            ui.painter()
                .rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(90, 90, 90, 40));
        }
        event
    }
}

/// Padded `[lo, hi]` so single values and edge points stay visible.
fn padded(range: Option<(f64, f64)>) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => (lo - 1.0, hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad, hi + pad)
        }
    }
}

impl View for ScatterView {
    fn name(&self) -> &str {
        "scatter"
    }

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError> {
        super::ensure_unique_states(data)?;

        // NaN means have no position on the duration axis.
        self.points = data
            .iter()
            .filter(|f| f.aggregate.has_comparable_duration())
            .map(|f| ScatterPoint {
                state: f.state().to_string(),
                x: f.avg_duration_seconds(),
                y: f.sighting_count() as f64,
                count: f.sighting_count(),
                filtered: f.filtered,
            })
            .collect();

        self.x_domain = padded(extent(self.points.iter().map(|p| p.x)));
        self.y_domain = padded(extent(self.points.iter().map(|p| p.y)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::fixtures::entry;

    #[test]
    fn nan_means_are_not_plotted_or_used_for_domains() {
        let mut scatter = ScatterView::new(ThresholdScale::default());
        scatter
            .update(&[
                entry("NY", 2, 90.0, false),
                entry("CA", 1, 30.0, true),
                entry("WA", 5, f64::NAN, true),
            ])
            .unwrap();

        assert_eq!(scatter.points.len(), 2);
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(close(scatter.x_domain.0, 27.0) && close(scatter.x_domain.1, 93.0));
        assert!(close(scatter.y_domain.0, 0.95) && close(scatter.y_domain.1, 2.05));
    }

    #[test]
    fn single_point_domain_is_widened() {
        assert_eq!(padded(Some((5.0, 5.0))), (4.0, 6.0));
        assert_eq!(padded(None), (0.0, 1.0));
    }

    #[test]
    fn external_clear_drops_rectangle() {
        let mut scatter = ScatterView::new(ThresholdScale::default());
        scatter.selection = Some(Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(5.0, 5.0)));

        scatter.reset_brush(FilterPredicate::rect(1.0, 2.0, 1.0, 2.0));
        assert!(scatter.selection.is_some());

        scatter.reset_brush(FilterPredicate::Cleared);
        assert!(scatter.selection.is_none());
    }
}
