//! Change notifications.
//!
//! The poll loop hands every changed [`Target`] to a [`Reporter`].  The
//! default [`ConsoleReporter`] writes a delimited block to the log and rings
//! the terminal bell.
//!
//! ## For contributors
//!
//! Notification is best-effort: a reporter must never panic or return an
//! error to the loop.  If your channel (desktop notification, webhook, ...)
//! can fail, log the failure and carry on.

use std::io;

use crossterm::{execute, style::Print};
use tracing::{debug, info};

use crate::target::Target;

/// Something that can tell a human that a page changed.
pub trait Reporter: Send {
    fn report(&self, target: &Target);
}

/// Logs a banner for the change and optionally beeps.
pub struct ConsoleReporter {
    bell: bool,
}

impl ConsoleReporter {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    fn ring_bell(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Print('\u{7}'))
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, target: &Target) {
        let [top, middle, bottom] = banner(target);
        info!("{top}");
        match target.last_changed {
            Some(at) => info!(changed_at = %at.to_rfc3339(), "{middle}"),
            None => info!("{middle}"),
        }
        info!("{bottom}");

        if self.bell {
            if let Err(e) = self.ring_bell() {
                debug!(error = %e, "Could not ring the terminal bell");
            }
        }
    }
}

/// The three lines of a change notification.
///
/// The closing rule is as wide as the opening one so the block lines up in a
/// monospaced log.
pub fn banner(target: &Target) -> [String; 3] {
    [
        format!("========= {} =========", target.name),
        format!("Content changed: {}", target.url),
        format!("{}{}", "=".repeat(20), "=".repeat(target.name.chars().count())),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_target_and_url() {
        let t = Target::new("Docs", "https://example.com/docs");
        let [top, middle, bottom] = banner(&t);

        assert_eq!(top, "========= Docs =========");
        assert_eq!(middle, "Content changed: https://example.com/docs");
        assert_eq!(bottom, "=".repeat(24));
    }

    #[test]
    fn closing_rule_matches_opening_width() {
        for name in ["x", "Release notes", "Änderungen"] {
            let [top, _, bottom] = banner(&Target::new(name, "https://example.com"));
            assert_eq!(top.chars().count(), bottom.chars().count(), "name: {name}");
        }
    }

    #[test]
    fn silent_reporter_does_not_panic() {
        let t = Target::new("a", "https://example.com");
        ConsoleReporter::new(false).report(&t);
    }
}
