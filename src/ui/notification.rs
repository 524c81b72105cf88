//! User feedback messages.
//!
//! The application records what happened (issue saved, fetch failed, ...)
//! as notifications; the front end decides when to show and drain them.

use std::collections::VecDeque;
use std::fmt;

/// Default number of notifications kept before the oldest is dropped.
const DEFAULT_CAPACITY: usize = 16;

/// The kind of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Success,
    Error,
}

impl NotificationType {
    /// Get the icon for this notification type.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Info => "ℹ",
            NotificationType::Success => "✓",
            NotificationType::Error => "✗",
        }
    }
}

/// A single notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
}

impl Notification {
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationType::Error)
    }

    /// Check if this is an error notification.
    pub fn is_error(&self) -> bool {
        self.notification_type == NotificationType::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.notification_type.icon(), self.message)
    }
}

/// A bounded queue of notifications.
#[derive(Debug)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
    capacity: usize,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    /// Create a new notification manager.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a notification manager keeping at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notifications: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Add a notification to the queue.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        // Remove oldest if we exceed the limit
        while self.notifications.len() > self.capacity {
            self.notifications.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::info(message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::success(message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::error(message));
    }

    /// Remove and return all notifications, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// The most recent error notification.
    pub fn last_error(&self) -> Option<&Notification> {
        self.notifications.iter().rev().find(|n| n.is_error())
    }

    /// Check if any queued notification is an error.
    pub fn has_errors(&self) -> bool {
        self.notifications.iter().any(Notification::is_error)
    }
}
