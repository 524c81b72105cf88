//! Terminal output for the command-line front end.
//!
//! Command results go to stdout; notifications and errors go to stderr.

use std::io::{self, Write};

use crate::error::AppError;
use crate::ui::NotificationManager;

/// Write queued notifications, draining them.
///
/// Error notifications are skipped when `include_errors` is false, so a
/// failure reported through the command's result is not printed twice.
pub fn write_notifications(
    notifications: &mut NotificationManager,
    include_errors: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    for notification in notifications.drain() {
        if notification.is_error() && !include_errors {
            continue;
        }
        writeln!(out, "{}", notification)?;
    }
    Ok(())
}

/// Write an error with its suggested action, if any.
pub fn write_error(error: &AppError, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Error: {}", error.user_message())?;
    if let Some(action) = error.suggested_action() {
        writeln!(out, "Hint: {}", action)?;
    }
    Ok(())
}
