//! Transient user notifications
//!
//! Outcomes of auth transitions and successful article mutations are
//! reported as [`Notification`]s through a [`Notifier`]. Rendering is the
//! notifier's business: [`ConsoleNotifier`] prints a coloured line,
//! [`RecordingNotifier`] keeps them for assertions.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use colored::Colorize;

/// Display duration used when none is configured.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        };
        write!(f, "{}", s)
    }
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub level: NotificationLevel,
    pub duration: Duration,
}

impl Notification {
    fn new(level: NotificationLevel, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            level,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title).with_description(description)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.title, description),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Notification surface
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Prints notifications to stdout, coloured by level
///
/// A terminal line cannot expire, so `duration` is only carried through to
/// the log.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::debug!(
            level = %notification.level,
            duration_ms = notification.duration.as_millis() as u64,
            "notification: {}",
            notification
        );

        let line = notification.to_string();
        match notification.level {
            NotificationLevel::Success => println!("{} {}", "✔".green(), line.green()),
            NotificationLevel::Error => println!("{} {}", "✘".red(), line.red()),
            NotificationLevel::Info => println!("{} {}", "ℹ".cyan(), line.cyan()),
        }
    }
}

/// Drops every notification
#[derive(Debug, Clone, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Keeps every notification in memory
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification.clone());
    }
}
