//! View state shared by the current-conditions and forecast views.
//!
//! Each view owns a [`RequestSlot`]: starting a request bumps its generation
//! and puts it in [`ViewState::Loading`]; a finished request only lands if no
//! newer one has started since.

use parking_lot::Mutex;
use tracing::debug;

pub mod city;
pub mod forecast;

pub use city::CityWeatherView;
pub use forecast::CoordinateForecastView;

/// Rendered in place of all content while a request is outstanding.
pub const LOADING_LINE: &str = "Loading...";

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one request started on a [`RequestSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Whether a finished request was applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Applied,
    /// A newer request started first; the result was dropped.
    Superseded,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u64,
    state: ViewState<T>,
}

#[derive(Debug)]
pub struct RequestSlot<T> {
    inner: Mutex<Slot<T>>,
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self { inner: Mutex::new(Slot { generation: 0, state: ViewState::Idle }) }
    }
}

impl<T: Clone> RequestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request: supersedes anything in flight and shows loading.
    pub fn begin(&self) -> Ticket {
        let mut slot = self.inner.lock();
        slot.generation += 1;
        slot.state = ViewState::Loading;
        Ticket(slot.generation)
    }

    /// Apply `state` if `ticket` belongs to the newest request.
    pub fn settle(&self, ticket: Ticket, state: ViewState<T>) -> Settle {
        let mut slot = self.inner.lock();
        if ticket.0 != slot.generation {
            debug!(ticket = ticket.0, current = slot.generation, "dropping superseded result");
            return Settle::Superseded;
        }
        slot.state = state;
        Settle::Applied
    }

    pub fn state(&self) -> ViewState<T> {
        self.inner.lock().state.clone()
    }
}
