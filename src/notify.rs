//! Transient user-facing notifications
//!
//! Every failure the session controller catches ends up here as a short
//! notification instead of propagating. The terminal implementation prints
//! a coloured one-liner; tests use a recording implementation.

use colored::Colorize;
use std::fmt;

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Informational confirmation ("New chat started")
    Default,
    /// Failure the user should act on ("Failed to send message")
    Destructive,
}

/// A single toast-style notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    /// Create an informational notification
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Default,
        }
    }

    /// Create a destructive (error) notification
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: Variant::Destructive,
        }
    }

    /// Whether this notification reports a failure
    pub fn is_error(&self) -> bool {
        self.variant == Variant::Destructive
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.description)
        }
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Prints notifications to the terminal
///
/// Informational notifications go to stdout in green, destructive ones to
/// stderr in red.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            Variant::Default => println!("{}", format!("✓ {}", notification).green()),
            Variant::Destructive => eprintln!("{}", format!("✗ {}", notification).red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_description() {
        let n = Notification::info("Theme updated", "Switched to dark theme");
        assert_eq!(n.to_string(), "Theme updated: Switched to dark theme");

        let n = Notification::error("Failed", "");
        assert_eq!(n.to_string(), "Failed");
    }

    #[test]
    fn test_variant_constructors() {
        assert!(!Notification::info("a", "b").is_error());
        assert!(Notification::error("a", "b").is_error());
    }

    #[test]
    fn test_terminal_notifier_smoke() {
        TerminalNotifier.notify(Notification::info("New chat started", "Ready for your questions!"));
        TerminalNotifier.notify(Notification::error("Failed to load chats", "timeout"));
    }
}
