use std::fmt;

use serde::{Deserialize, Serialize};

/// Sink for messages meant for the operator (warnings and errors).
///
/// The engine reports recoverable problems here instead of failing: a
/// malformed currency clause, a missing table formula, an unknown item.
pub trait Notifier {
    /// Report a recoverable problem.
    fn warn(&mut self, message: &str);
    /// Report a failure of a sub-operation.
    fn error(&mut self, message: &str);
}

/// Notifier that forwards every message to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&mut self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Severity of a collected notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// A warning.
    Warn,
    /// An error.
    Error,
}

/// A single collected message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable text.
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Warn => write!(f, "warning: {}", self.message),
            NoticeLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Notifier that keeps every message (and still logs it).
#[derive(Debug, Clone, Default)]
pub struct Notices {
    entries: Vec<Notice>,
}

impl Notices {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected notices, oldest first.
    pub fn entries(&self) -> &[Notice] {
        &self.entries
    }

    /// Collected warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.entries
            .iter()
            .filter(|n| n.level == NoticeLevel::Warn)
    }

    /// Collected errors.
    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.entries
            .iter()
            .filter(|n| n.level == NoticeLevel::Error)
    }

    /// True if any collected message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|n| n.message.contains(needle))
    }

    /// True if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Notifier for Notices {
    fn warn(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.entries.push(Notice {
            level: NoticeLevel::Warn,
            message: message.to_string(),
        });
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
        self.entries.push(Notice {
            level: NoticeLevel::Error,
            message: message.to_string(),
        });
    }
}
