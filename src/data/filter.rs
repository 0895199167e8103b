use super::model::{FilteredAggregate, StateYearAggregate};

// ---------------------------------------------------------------------------
// Filter predicate: the brushed rectangle over (avg duration, count)
// ---------------------------------------------------------------------------

/// The active brush selection in data space.
///
/// `x` is average duration in seconds, `y` is sighting count.  Bounds are
/// inclusive.  A `Rect` with zero width, zero height or a `NaN` bound selects
/// nothing and behaves as `Cleared`, however it was built.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterPredicate {
    /// No selection: nothing is filtered.
    #[default]
    Cleared,
    Rect { x0: f64, x1: f64, y0: f64, y1: f64 },
}

impl FilterPredicate {
    /// Build a rectangle, normalizing reversed bounds.
    ///
    /// A rectangle with zero width or zero height is the brush-reset gesture
    /// and becomes [`FilterPredicate::Cleared`]; so does one with a `NaN`
    /// bound.
    pub fn rect(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        match normalized(x0, x1, y0, y1) {
            Some((x0, x1, y0, y1)) => FilterPredicate::Rect { x0, x1, y0, y1 },
            None => FilterPredicate::Cleared,
        }
    }

    /// Whether the predicate filters nothing, including degenerate rectangles.
    pub fn is_cleared(&self) -> bool {
        match *self {
            FilterPredicate::Cleared => true,
            FilterPredicate::Rect { x0, x1, y0, y1 } => normalized(x0, x1, y0, y1).is_none(),
        }
    }

    /// Whether the aggregate lies outside the selection.
    ///
    /// A `NaN` average is never inside a rectangle.
    pub fn excludes(&self, aggregate: &StateYearAggregate) -> bool {
        match *self {
            FilterPredicate::Cleared => false,
            FilterPredicate::Rect { x0, x1, y0, y1 } => {
                let Some((x0, x1, y0, y1)) = normalized(x0, x1, y0, y1) else {
                    return false;
                };
                let avg = aggregate.avg_duration_seconds;
                if avg.is_nan() {
                    return true;
                }
                let count = aggregate.sighting_count as f64;
                avg < x0 || avg > x1 || count < y0 || count > y1
            }
        }
    }
}

/// Ordered bounds, or `None` for a rectangle that selects nothing.
fn normalized(x0: f64, x1: f64, y0: f64, y1: f64) -> Option<(f64, f64, f64, f64)> {
    if [x0, x1, y0, y1].iter().any(|v| v.is_nan()) || x0 == x1 || y0 == y1 {
        return None;
    }
    Some((x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1)))
}

// ---------------------------------------------------------------------------
// FilterState: current predicate plus the annotation step
// ---------------------------------------------------------------------------

/// Holds the current predicate and annotates aggregate sets with it.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    predicate: FilterPredicate,
}

impl FilterState {
    pub fn predicate(&self) -> FilterPredicate {
        self.predicate
    }

    pub fn set(&mut self, predicate: FilterPredicate) {
        self.predicate = predicate;
    }

    pub fn clear(&mut self) {
        self.predicate = FilterPredicate::Cleared;
    }

    pub fn apply(&self, aggregates: &[StateYearAggregate]) -> Vec<FilteredAggregate> {
        apply_brush(aggregates, &self.predicate)
    }
}

/// Annotate every aggregate with its `filtered` flag.  Pure.
pub fn apply_brush(aggregates: &[StateYearAggregate], predicate: &FilterPredicate) -> Vec<FilteredAggregate> {
    aggregates
        .iter()
        .map(|agg| FilteredAggregate {
            filtered: predicate.excludes(agg),
            aggregate: agg.clone(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Axis scales and brush conversion
// ---------------------------------------------------------------------------

/// Linear mapping between a data domain and a pixel range.
///
/// Either interval may be reversed; screen y axes usually are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl AxisScale {
    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Pixel → data value.
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// Pixel-space drag rectangle as reported by the view (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Turns a raw brush gesture into a [`FilterPredicate`].
///
/// The scales are the ones the brushing view is drawing with at the moment
/// of the gesture; they are passed in rather than looked up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushController {
    pub axis_scale_x: AxisScale,
    pub axis_scale_y: AxisScale,
}

impl BrushController {
    pub fn new(axis_scale_x: AxisScale, axis_scale_y: AxisScale) -> Self {
        Self {
            axis_scale_x,
            axis_scale_y,
        }
    }

    /// `None` is the cleared signal.
    pub fn predicate(&self, selection: Option<PixelRect>) -> FilterPredicate {
        let Some(sel) = selection else {
            return FilterPredicate::Cleared;
        };
        let x0 = self.axis_scale_x.invert(sel.x0);
        let x1 = self.axis_scale_x.invert(sel.x1);
        // The bottom edge of the rectangle is the low end of the count axis.
        let y0 = self.axis_scale_y.invert(sel.y1);
        let y1 = self.axis_scale_y.invert(sel.y0);
        FilterPredicate::rect(x0, x1, y0, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::YearKey;
    use proptest::prelude::*;

    fn agg(state: &str, count: usize, avg: f64) -> StateYearAggregate {
        StateYearAggregate {
            year: YearKey(2000),
            state: state.to_string(),
            sighting_count: count,
            avg_duration_seconds: avg,
        }
    }

    fn flags(filtered: &[FilteredAggregate]) -> Vec<(String, bool)> {
        filtered.iter().map(|f| (f.state().to_string(), f.filtered)).collect()
    }

    #[test]
    fn rectangle_filters_outside_entries() {
        let aggs = vec![agg("NY", 2, 90.0), agg("CA", 1, 30.0)];
        let out = apply_brush(&aggs, &FilterPredicate::rect(50.0, 100.0, 1.0, 5.0));

        assert_eq!(flags(&out), vec![("NY".into(), false), ("CA".into(), true)]);
    }

    #[test]
    fn degenerate_rectangle_clears() {
        assert_eq!(FilterPredicate::rect(10.0, 10.0, 0.0, 100.0), FilterPredicate::Cleared);
        assert_eq!(FilterPredicate::rect(0.0, 100.0, 3.0, 3.0), FilterPredicate::Cleared);

        let aggs = vec![agg("NY", 2, 90.0), agg("CA", 1, 30.0)];
        let out = apply_brush(&aggs, &FilterPredicate::rect(10.0, 10.0, 0.0, 1.0));
        assert!(out.iter().all(|f| !f.filtered));
    }

    #[test]
    fn hand_built_degenerate_rect_filters_nothing() {
        let aggs = vec![agg("NY", 2, 90.0), agg("CA", 1, 30.0)];
        let flat = FilterPredicate::Rect {
            x0: 70.0,
            x1: 70.0,
            y0: 1.0,
            y1: 5.0,
        };

        assert!(flat.is_cleared());
        assert_eq!(flags(&apply_brush(&aggs, &flat)), vec![("NY".into(), false), ("CA".into(), false)]);
    }

    #[test]
    fn hand_built_reversed_rect_is_reordered() {
        let aggs = vec![agg("NY", 2, 90.0), agg("CA", 1, 30.0)];
        let reversed = FilterPredicate::Rect {
            x0: 100.0,
            x1: 50.0,
            y0: 5.0,
            y1: 1.0,
        };
        assert_eq!(flags(&apply_brush(&aggs, &reversed)), vec![("NY".into(), false), ("CA".into(), true)]);
    }

    #[test]
    fn nan_bound_clears() {
        assert_eq!(FilterPredicate::rect(f64::NAN, 100.0, 1.0, 5.0), FilterPredicate::Cleared);
        assert_eq!(FilterPredicate::rect(50.0, 100.0, 1.0, f64::NAN), FilterPredicate::Cleared);

        let aggs = vec![agg("NY", 2, 90.0), agg("CA", 1, 30.0)];
        let raw = FilterPredicate::Rect {
            x0: f64::NAN,
            x1: 100.0,
            y0: 1.0,
            y1: 5.0,
        };
        assert!(apply_brush(&aggs, &raw).iter().all(|f| !f.filtered));
    }

    #[test]
    fn bounds_are_inclusive_and_reorderable() {
        let aggs = vec![agg("NY", 2, 90.0)];
        let out = apply_brush(&aggs, &FilterPredicate::rect(90.0, 50.0, 2.0, 1.0));
        assert!(!out[0].filtered);
    }

    #[test]
    fn nan_average_is_always_outside() {
        let aggs = vec![agg("WA", 3, f64::NAN)];
        let wide = FilterPredicate::rect(f64::MIN, f64::MAX, 0.0, 1e9);

        assert!(apply_brush(&aggs, &wide)[0].filtered);
        assert!(!apply_brush(&aggs, &FilterPredicate::Cleared)[0].filtered);
    }

    #[test]
    fn filter_state_tracks_predicate() {
        let mut state = FilterState::default();
        assert!(state.predicate().is_cleared());

        state.set(FilterPredicate::rect(0.0, 10.0, 0.0, 10.0));
        let out = state.apply(&[agg("NY", 20, 5.0)]);
        assert!(out[0].filtered);

        state.clear();
        assert!(!state.apply(&[agg("NY", 20, 5.0)])[0].filtered);
    }

    #[test]
    fn scale_inverts_reversed_pixel_range() {
        // 200px tall plot, y=0 at the top.
        let y = AxisScale::linear((0.0, 10.0), (200.0, 0.0));
        assert_eq!(y.invert(200.0), 0.0);
        assert_eq!(y.invert(100.0), 5.0);
        assert_eq!(y.invert(50.0), 7.5);
        assert_eq!(AxisScale::linear((3.0, 9.0), (10.0, 10.0)).invert(10.0), 3.0);
    }

    #[test]
    fn brush_controller_inverts_pixels_to_domain() {
        let controller = BrushController::new(
            AxisScale::linear((0.0, 1000.0), (0.0, 100.0)),
            AxisScale::linear((0.0, 10.0), (200.0, 0.0)),
        );
        let predicate = controller.predicate(Some(PixelRect {
            x0: 10.0,
            y0: 40.0,
            x1: 50.0,
            y1: 180.0,
        }));

        assert_eq!(
            predicate,
            FilterPredicate::Rect {
                x0: 100.0,
                x1: 500.0,
                y0: 1.0,
                y1: 8.0
            }
        );
        assert_eq!(controller.predicate(None), FilterPredicate::Cleared);
    }

    #[test]
    fn click_without_drag_clears() {
        let controller = BrushController::new(
            AxisScale::linear((0.0, 1000.0), (0.0, 100.0)),
            AxisScale::linear((0.0, 10.0), (200.0, 0.0)),
        );
        let point = PixelRect {
            x0: 30.0,
            y0: 30.0,
            x1: 30.0,
            y1: 30.0,
        };
        assert!(controller.predicate(Some(point)).is_cleared());
    }

    fn arb_agg() -> impl Strategy<Value = StateYearAggregate> {
        (
            prop::sample::select(vec!["NY", "CA", "TX", "WA"]),
            1usize..400,
            prop_oneof![Just(f64::NAN), 0.0..5000.0f64],
        )
            .prop_map(|(state, count, avg)| agg(state, count, avg))
    }

    proptest! {
        #[test]
        fn cleared_never_filters(aggs in prop::collection::vec(arb_agg(), 0..40)) {
            let out = apply_brush(&aggs, &FilterPredicate::Cleared);
            prop_assert!(out.iter().all(|f| !f.filtered));
        }

        #[test]
        fn brushing_is_idempotent(
            aggs in prop::collection::vec(arb_agg(), 0..40),
            x0 in 0.0..5000.0f64, x1 in 0.0..5000.0f64,
            y0 in 0.0..400.0f64, y1 in 0.0..400.0f64,
        ) {
            let predicate = FilterPredicate::rect(x0, x1, y0, y1);
            let once = apply_brush(&aggs, &predicate);
            let twice = apply_brush(&aggs, &predicate);
            prop_assert_eq!(flags(&once), flags(&twice));
            if !predicate.is_cleared() {
                for f in &once {
                    if f.avg_duration_seconds().is_nan() {
                        prop_assert!(f.filtered);
                    }
                }
            }
        }
    }
}
