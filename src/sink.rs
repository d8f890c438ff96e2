//! Reporting surfaces
//!
//! A [`ReportSink`] is where compile output ends up: an append-only log
//! plus transient notifications. The editor bridge forwards both to the
//! client, the CLI prints them, and tests collect them in memory.

use std::sync::Mutex;
use tower_lsp::async_trait;

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A short-lived message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Append-only log plus notification surface.
///
/// Implementations are shared between concurrently running dispatches, so
/// each call must be safe to interleave with calls from other tasks.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Append one line of text to the log
    async fn append_line(&self, line: &str);

    /// Show a notification
    async fn notify(&self, notification: Notification);
}

/// Sink that records everything in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
    notifications: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the log
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Snapshot of the notifications shown so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Whether any log line contains `needle`
    pub fn log_contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// True if nothing was logged or shown
    pub fn is_empty(&self) -> bool {
        self.lines().is_empty() && self.notifications().is_empty()
    }
}

#[async_trait]
impl ReportSink for MemorySink {
    async fn append_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    async fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

/// Sink for the command line: log to stdout, notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

#[async_trait]
impl ReportSink for ConsoleSink {
    async fn append_line(&self, line: &str) {
        println!("{}", line);
    }

    async fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => eprintln!("{}", notification.message),
            NotificationLevel::Error => eprintln!("Error: {}", notification.message),
        }
    }
}
