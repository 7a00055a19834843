//! User-facing notifications

use std::fmt;
use std::sync::Arc;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Receives short status messages meant for the user
pub trait NotificationSink {
    fn notify(&self, message: &str, severity: Severity);
}

impl<N: NotificationSink + ?Sized> NotificationSink for Arc<N> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity);
    }
}

/// Sink that forwards notifications to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(target: "quoteday::notify", "{message}"),
            Severity::Warning => tracing::warn!(target: "quoteday::notify", "{message}"),
            Severity::Error => tracing::error!(target: "quoteday::notify", "{message}"),
        }
    }
}
