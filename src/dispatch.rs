use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::data::model::{FilteredAggregate, YearKey};

// ---------------------------------------------------------------------------
// View capability
// ---------------------------------------------------------------------------

/// Anything that renders the filtered aggregate snapshot.
///
/// Views receive data only through [`View::update`] and must not talk to each
/// other.  A view that needs derived state builds its own copy.
pub trait View {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// The selected year, delivered before every [`View::update`].
    ///
    /// An empty snapshot cannot carry its year, so views that draw raw rows
    /// take it from here.
    fn year_selected(&mut self, _year: Option<YearKey>) {}

    fn update(&mut self, data: &[FilteredAggregate]) -> Result<(), ViewError>;
}

/// Shared handle: the dispatcher pushes updates, the UI draws.
pub type ViewHandle = Rc<RefCell<dyn View>>;

/// Why a view refused a snapshot.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Two aggregates in one snapshot carried the same state key.
    #[error("duplicate state key '{0}' in snapshot")]
    DuplicateKey(String),

    /// A snapshot must describe a single year.
    #[error("snapshot mixes years {first} and {other}")]
    MixedYears { first: YearKey, other: YearKey },
}

/// A broadcast that stopped before reaching every view.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("view #{index} ({view}) failed: {source}")]
    ViewFault {
        index: usize,
        view: String,
        #[source]
        source: ViewError,
    },

    /// The view was already borrowed, i.e. a broadcast re-entered itself.
    #[error("view #{index} is busy; nested broadcast refused")]
    ViewBusy { index: usize },
}

// ---------------------------------------------------------------------------
// Registry / dispatcher
// ---------------------------------------------------------------------------

/// Ordered list of registered views.
#[derive(Default)]
pub struct Dispatcher {
    views: Vec<ViewHandle>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a view.  Broadcasts reach views in registration order.
    pub fn register(&mut self, view: ViewHandle) {
        self.views.push(view);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Hand the selected year and the same snapshot to every view,
    /// synchronously and in order.
    ///
    /// Stops at the first failing view and returns its error; later views
    /// are not notified.
    pub fn broadcast(&self, year: Option<YearKey>, data: &[FilteredAggregate]) -> Result<(), DispatchError> {
        log::debug!(
            "broadcasting {} aggregates to {} views",
            data.len(),
            self.views.len()
        );
        for (index, handle) in self.views.iter().enumerate() {
            let mut view = handle
                .try_borrow_mut()
                .map_err(|_| DispatchError::ViewBusy { index })?;
            view.year_selected(year);
            view.update(data).map_err(|source| DispatchError::ViewFault {
                index,
                view: view.name().to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("views", &self.views.len())
            .finish()
    }
}
