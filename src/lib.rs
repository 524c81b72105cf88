//! LazyIssues - a terminal client for a REST issue tracker.
//!
//! The crate is split leaf-first:
//! - [`api`]: issue data model and the async backend client
//! - [`ui`]: list, detail and form views plus text rendering
//! - [`tasks`]: background execution of backend calls
//! - [`app`]: the application state tying views and tasks together
//! - [`cli`] / [`output`]: the command-line front end

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod tasks;
pub mod ui;
