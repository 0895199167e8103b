use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::color::ThresholdScale;
use crate::config::ViewerConfig;
use crate::data::geometry::{StateShape, load_geometry};
use crate::data::loader::load_sightings;
use crate::data::model::{RecordStore, YearKey};
use crate::data::rollups::rows_for_year;
use crate::dispatch::DispatchError;
use crate::engine::CoreState;
use crate::ui::area::AreaView;
use crate::ui::bar::BarView;
use crate::ui::map::MapView;
use crate::ui::pie::PieView;
use crate::ui::scatter::{BrushEvent, ScatterView};
use crate::ui::table::SightingsTable;

// ---------------------------------------------------------------------------
// Session: one loaded dataset with its engine and views
// ---------------------------------------------------------------------------

/// Typed handles to the registered views, for drawing.
pub struct Views {
    pub map: Rc<RefCell<MapView>>,
    pub scatter: Rc<RefCell<ScatterView>>,
    pub pie: Rc<RefCell<PieView>>,
    pub bar: Rc<RefCell<BarView>>,
    pub area: Rc<RefCell<AreaView>>,
    pub table: Rc<RefCell<SightingsTable>>,
}

pub struct Session {
    pub core: CoreState,
    pub views: Views,
    pub year_range: (YearKey, YearKey),
    /// Slider position; may point at a year with no data.
    pub slider_year: i32,
    /// Target-country sightings in the selected year (header count).
    pub year_total: usize,
    pub source: String,
    country: String,
}

impl Session {
    /// Build every view, register them in display order and select the
    /// initial year.
    pub fn new(records: RecordStore, shapes: Vec<StateShape>, config: &ViewerConfig, source: String) -> Result<Self> {
        let (first, last) = records
            .year_range()
            .context("dataset has no rows with a valid year")?;
        let records = Rc::new(records);
        let scale = ThresholdScale::new(config.count_thresholds);
        let country = config.target_country.as_str();

        let views = Views {
            map: Rc::new(RefCell::new(MapView::new(Rc::clone(&records), shapes, scale.clone(), country))),
            scatter: Rc::new(RefCell::new(ScatterView::new(scale))),
            pie: Rc::new(RefCell::new(PieView::new(Rc::clone(&records), country))),
            bar: Rc::new(RefCell::new(BarView::new(&records, country))),
            area: Rc::new(RefCell::new(AreaView::new(&records, country))),
            table: Rc::new(RefCell::new(SightingsTable::new(Rc::clone(&records), country))),
        };

        let mut core = CoreState::new(records);
        core.register(views.map.clone());
        core.register(views.scatter.clone());
        core.register(views.pie.clone());
        core.register(views.bar.clone());
        core.register(views.area.clone());
        core.register(views.table.clone());

        let initial = config
            .initial_year
            .map(|y| y.clamp(first.value(), last.value()))
            .unwrap_or(last.value());

        let mut session = Session {
            core,
            views,
            year_range: (first, last),
            slider_year: initial,
            year_total: 0,
            source,
            country: config.target_country.clone(),
        };
        session.set_year(initial)?;
        Ok(session)
    }

    pub fn set_year(&mut self, year: i32) -> Result<(), DispatchError> {
        let year = YearKey(year);
        self.slider_year = year.value();
        self.year_total = rows_for_year(self.core.records().records(), year, &self.country).len();
        self.core.select_year(year).map(|_| ())
    }

    pub fn brush(&mut self, event: BrushEvent) -> Result<(), DispatchError> {
        self.core.brush(&event.controller, event.selection)
    }

    pub fn clear_brush(&mut self) -> Result<(), DispatchError> {
        self.core.clear_brush()?;
        self.views.scatter.borrow_mut().reset_brush(self.core.predicate());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded dataset (None until user loads a file).
    pub session: Option<Session>,

    /// Boundary shapes, kept so a later dataset load can reuse them.
    pub shapes: Vec<StateShape>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start from a config, opening any files it names.
    pub fn new(config: ViewerConfig) -> Self {
        let mut state = Self {
            config,
            session: None,
            shapes: Vec::new(),
            status_message: None,
        };
        if let Some(path) = state.config.geometry_path.clone() {
            state.open_geometry(&path);
        }
        if let Some(path) = state.config.data_path.clone() {
            state.open_dataset(&path);
        }
        state
    }

    /// Load a sightings CSV and replace the current session.
    pub fn open_dataset(&mut self, path: &Path) {
        let result = load_sightings(path).and_then(|records| {
            if records.is_empty() {
                log::warn!("{} contains no data rows", path.display());
            }
            log::info!(
                "Loaded {} sightings from {} ({} rejected, {} without year/state/country)",
                records.len(),
                path.display(),
                records.rejected_rows(),
                records.excluded_from_aggregation()
            );
            Session::new(records, self.shapes.clone(), &self.config, path.display().to_string())
        });
        match result {
            Ok(session) => {
                self.session = Some(session);
                self.status_message = None;
            }
            Err(e) => self.report("Failed to load dataset", &e),
        }
    }

    /// Load state boundaries and hand them to the map.
    pub fn open_geometry(&mut self, path: &Path) {
        match load_geometry(path) {
            Ok(shapes) => {
                log::info!("Loaded {} state shapes from {}", shapes.len(), path.display());
                if let Some(session) = &self.session {
                    session.views.map.borrow_mut().set_shapes(shapes.clone());
                }
                self.shapes = shapes;
            }
            Err(e) => self.report("Failed to load boundaries", &e),
        }
    }

    /// Slider handler.
    pub fn set_year(&mut self, year: i32) {
        let Some(session) = &mut self.session else {
            return;
        };
        if let Err(e) = session.set_year(year) {
            self.report("Year change failed", &anyhow::Error::new(e));
        }
    }

    /// Scatter brush handler.
    pub fn apply_brush(&mut self, event: BrushEvent) {
        let Some(session) = &mut self.session else {
            return;
        };
        if let Err(e) = session.brush(event) {
            self.report("Brush failed", &anyhow::Error::new(e));
        }
    }

    pub fn clear_brush(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        if let Err(e) = session.clear_brush() {
            self.report("Clearing brush failed", &anyhow::Error::new(e));
        }
    }

    fn report(&mut self, what: &str, err: &anyhow::Error) {
        log::error!("{what}: {err:#}");
        self.status_message = Some(format!("{what}: {err:#}"));
    }
}
