use std::rc::Rc;

use crate::data::aggregate::aggregate;
use crate::data::filter::{BrushController, FilterPredicate, FilterState, PixelRect};
use crate::data::model::{FilteredAggregate, RecordStore, StateYearAggregate, YearKey};
use crate::dispatch::{DispatchError, Dispatcher, ViewHandle};

// ---------------------------------------------------------------------------
// Core state: the cross-filtering pipeline
// ---------------------------------------------------------------------------

/// Owns everything the linked views are driven from.
///
/// Every transition runs aggregate → filter → broadcast to completion before
/// returning.  A year change replaces `last_aggregates` wholesale; a brush
/// change re-filters the existing aggregates without re-aggregating.
#[derive(Debug)]
pub struct CoreState {
    records: Rc<RecordStore>,
    current_year: Option<YearKey>,
    filter: FilterState,
    last_aggregates: Vec<StateYearAggregate>,
    snapshot: Vec<FilteredAggregate>,
    /// Whether every view received `snapshot`.
    delivered: bool,
    dispatcher: Dispatcher,
}

impl CoreState {
    pub fn new(records: Rc<RecordStore>) -> Self {
        Self {
            records,
            current_year: None,
            filter: FilterState::default(),
            last_aggregates: Vec::new(),
            snapshot: Vec::new(),
            delivered: false,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn register(&mut self, view: ViewHandle) {
        self.dispatcher.register(view);
        log::debug!("{} views registered", self.dispatcher.len());
    }

    pub fn records(&self) -> &Rc<RecordStore> {
        &self.records
    }

    pub fn current_year(&self) -> Option<YearKey> {
        self.current_year
    }

    pub fn predicate(&self) -> FilterPredicate {
        self.filter.predicate()
    }

    /// The snapshot most recently handed to the views.
    pub fn snapshot(&self) -> &[FilteredAggregate] {
        &self.snapshot
    }

    // -- Year selection --

    /// Select a year and rerun the whole pipeline, even if it is unchanged.
    ///
    /// A year with no data still broadcasts, with an empty snapshot.
    pub fn set_year(&mut self, year: YearKey) -> Result<(), DispatchError> {
        self.current_year = Some(year);
        self.last_aggregates = aggregate(self.records.records(), year);
        log::debug!(
            "year {year}: {} state aggregates",
            self.last_aggregates.len()
        );
        self.refilter()
    }

    /// Like [`CoreState::set_year`] but skips the work when the year is
    /// already selected and its snapshot reached every view.  Returns whether
    /// a broadcast happened.
    pub fn select_year(&mut self, year: YearKey) -> Result<bool, DispatchError> {
        if self.current_year == Some(year) && self.delivered {
            return Ok(false);
        }
        self.set_year(year)?;
        Ok(true)
    }

    // -- Brushing --

    /// Replace the predicate, re-filter the current aggregates and broadcast.
    pub fn set_predicate(&mut self, predicate: FilterPredicate) -> Result<(), DispatchError> {
        log::debug!("brush predicate: {predicate:?}");
        self.filter.set(predicate);
        self.refilter()
    }

    /// Convert a pixel-space brush gesture with the view's scales and apply it.
    pub fn brush(
        &mut self,
        controller: &BrushController,
        selection: Option<PixelRect>,
    ) -> Result<(), DispatchError> {
        self.set_predicate(controller.predicate(selection))
    }

    pub fn clear_brush(&mut self) -> Result<(), DispatchError> {
        log::debug!("brush cleared");
        self.filter.clear();
        self.refilter()
    }

    fn refilter(&mut self) -> Result<(), DispatchError> {
        self.snapshot = self.filter.apply(&self.last_aggregates);
        let result = self.dispatcher.broadcast(self.current_year, &self.snapshot);
        self.delivered = result.is_ok();
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data::filter::AxisScale;
    use crate::data::model::SightingRecord;
    use crate::dispatch::testing::{RecordingView, Seen};

    fn rec(year: i32, state: &str, country: &str, duration: Option<f64>) -> SightingRecord {
        SightingRecord {
            year: Some(YearKey(year)),
            state: state.to_string(),
            country: country.to_string(),
            duration_seconds: duration,
            ..Default::default()
        }
    }

    fn setup() -> (CoreState, Rc<RefCell<Vec<Seen>>>) {
        let store = RecordStore::new(vec![
            rec(2000, "NY", "us", Some(60.0)),
            rec(2000, "NY", "us", Some(120.0)),
            rec(2000, "CA", "us", Some(30.0)),
            rec(2000, "", "us", Some(30.0)),
            rec(2001, "TX", "us", None),
        ]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut core = CoreState::new(Rc::new(store));
        core.register(RecordingView::handle("map", &log));
        core.register(RecordingView::handle("scatter", &log));
        (core, log)
    }

    fn sorted(mut states: Vec<(String, bool)>) -> Vec<(String, bool)> {
        states.sort();
        states
    }

    #[test]
    fn year_change_runs_full_pipeline() {
        let (mut core, log) = setup();
        core.set_year(YearKey(2000)).unwrap();

        let seen = log.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            sorted(seen[0].states.clone()),
            vec![("CA".to_string(), false), ("NY".to_string(), false)]
        );
        assert_eq!(seen[0].ptr, seen[1].ptr);
        assert_eq!(seen[0].ptr, core.snapshot().as_ptr() as usize);
    }

    #[test]
    fn brush_marks_outside_states() {
        let (mut core, log) = setup();
        core.set_year(YearKey(2000)).unwrap();
        core.set_predicate(FilterPredicate::rect(50.0, 100.0, 1.0, 5.0)).unwrap();

        let last = log.borrow().last().unwrap().states.clone();
        assert_eq!(
            sorted(last),
            vec![("CA".to_string(), true), ("NY".to_string(), false)]
        );
    }

    #[test]
    fn degenerate_brush_clears_everything() {
        let (mut core, log) = setup();
        core.set_year(YearKey(2000)).unwrap();
        core.set_predicate(FilterPredicate::rect(50.0, 100.0, 1.0, 5.0)).unwrap();
        core.set_predicate(FilterPredicate::rect(70.0, 70.0, 1.0, 5.0)).unwrap();

        assert!(core.predicate().is_cleared());
        assert!(log.borrow().last().unwrap().states.iter().all(|(_, f)| !f));
    }

    #[test]
    fn unknown_year_broadcasts_empty_snapshot() {
        let (mut core, log) = setup();
        core.set_year("1899".parse().unwrap()).unwrap();

        assert!(core.snapshot().is_empty());
        let seen = log.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.states.is_empty()));
    }

    #[test]
    fn predicate_survives_year_change() {
        let (mut core, log) = setup();
        core.set_year(YearKey(2000)).unwrap();
        core.set_predicate(FilterPredicate::rect(0.0, 1000.0, 1.0, 5.0)).unwrap();
        core.set_year(YearKey(2001)).unwrap();

        // TX has no durations, so its NaN mean is outside any rectangle.
        let last = log.borrow().last().unwrap().states.clone();
        assert_eq!(last, vec![("TX".to_string(), true)]);
    }

    #[test]
    fn same_year_can_skip_or_recompute() {
        let (mut core, log) = setup();
        assert!(core.select_year(YearKey(2000)).unwrap());
        let first = core.snapshot().to_vec();

        assert!(!core.select_year(YearKey(2000)).unwrap());
        assert_eq!(log.borrow().len(), 2);

        core.set_year(YearKey(2000)).unwrap();
        assert_eq!(log.borrow().len(), 4);
        assert_eq!(core.snapshot(), first.as_slice());
    }

    #[test]
    fn pixel_brush_goes_through_scales() {
        let (mut core, log) = setup();
        core.set_year(YearKey(2000)).unwrap();

        // x: 0..200 s over 0..200 px, y: 0..4 sightings over 100..0 px.
        let controller = BrushController::new(
            AxisScale::linear((0.0, 200.0), (0.0, 200.0)),
            AxisScale::linear((0.0, 4.0), (100.0, 0.0)),
        );
        let selection = PixelRect {
            x0: 50.0,
            y0: 25.0,
            x1: 150.0,
            y1: 75.0,
        };
        core.brush(&controller, Some(selection)).unwrap();
        assert_eq!(core.predicate(), FilterPredicate::rect(50.0, 150.0, 1.0, 3.0));
        assert_eq!(
            sorted(log.borrow().last().unwrap().states.clone()),
            vec![("CA".to_string(), true), ("NY".to_string(), false)]
        );

        core.brush(&controller, None).unwrap();
        assert!(core.predicate().is_cleared());
    }

    #[test]
    fn hand_built_flat_rect_filters_nothing() {
        let (mut core, log) = setup();
        core.set_year(YearKey(2000)).unwrap();
        core.set_predicate(FilterPredicate::Rect {
            x0: 70.0,
            x1: 70.0,
            y0: 1.0,
            y1: 5.0,
        })
        .unwrap();

        assert!(log.borrow().last().unwrap().states.iter().all(|(_, f)| !f));
    }

    #[test]
    fn same_year_is_resent_after_a_fault() {
        let (mut core, log) = setup();
        core.register(RecordingView::failing("pie", &log));

        assert!(core.select_year(YearKey(2000)).is_err());
        assert_eq!(log.borrow().len(), 3);

        // The failed snapshot never reached every view, so it goes out again.
        assert!(core.select_year(YearKey(2000)).is_err());
        assert_eq!(log.borrow().len(), 6);
    }

    #[test]
    fn fault_surfaces_to_caller() {
        let (mut core, log) = setup();
        core.register(RecordingView::failing("pie", &log));

        let err = core.set_year(YearKey(2000)).unwrap_err();
        assert!(matches!(err, DispatchError::ViewFault { index: 2, .. }));
        // The snapshot was still computed; only delivery failed.
        assert_eq!(core.snapshot().len(), 2);
    }
}
