//! Application views (screens).
//!
//! Each view owns the state behind one screen and renders it as text. Views
//! never perform I/O: state changes that need the backend return a sequenced
//! request for the caller to run, and the result is handed back through the
//! view's `apply_response`.

mod detail;
mod form;
mod list;

pub use detail::{DetailRequest, DetailView};
pub use form::{FormMode, FormOutcome, FormView, IssueDraft, SubmitRequest};
pub use list::{FetchRequest, ListView};

/// Loading state of a view backed by a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet, or the last request finished successfully.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request failed; previously loaded data is still shown.
    Failed(String),
}

impl LoadState {
    /// Check if a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// The error message of the last failed request.
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Issues monotonically increasing request sequence numbers.
///
/// Only the response to the most recently issued request is current; any
/// other response is stale and must be dropped.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    last_issued: u64,
}

impl RequestSequence {
    /// Issue the next sequence number.
    pub fn next(&mut self) -> u64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// Check if `seq` belongs to the most recently issued request.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.last_issued && seq != 0
    }

    /// The most recently issued sequence number (0 if none).
    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }
}
