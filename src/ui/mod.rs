//! User interface views and text rendering.
//!
//! Views hold the state behind each screen and render it as plain text for
//! the command-line front end.

pub mod format;
mod notification;
mod views;

pub use notification::{Notification, NotificationManager, NotificationType};
pub use views::{
    DetailRequest, DetailView, FetchRequest, FormMode, FormOutcome, FormView, IssueDraft, ListView,
    LoadState, RequestSequence, SubmitRequest,
};
