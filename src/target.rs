//! The monitored page and its last known content.
//!
//! A `Target` is the only place snapshots live; there is no separate store.
//! The poll loop is the single writer.

use chrono::{DateTime, Utc};

/// One monitored page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Display label used in log lines and change banners.
    pub name: String,

    /// Absolute URL that gets fetched every cycle.
    pub url: String,

    /// Sanitized content from the most recent successful fetch.
    ///
    /// Empty until a fetch succeeds.  Because comparison is plain equality,
    /// the first non-empty content after a failed initial fetch always counts
    /// as a change.
    pub snapshot: String,

    /// When the snapshot last changed after initialization.
    pub last_changed: Option<DateTime<Utc>>,
}

/// Result of comparing fresh content against a target's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Unchanged,
    Changed,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            snapshot: String::new(),
            last_changed: None,
        }
    }

    /// Record the content seen during initialization.  Never a change.
    pub fn seed(&mut self, content: String) {
        self.snapshot = content;
    }

    /// Compare `content` with the snapshot and replace it when they differ.
    pub fn observe(&mut self, content: String) -> Observation {
        if content == self.snapshot {
            return Observation::Unchanged;
        }
        self.snapshot = content;
        self.last_changed = Some(Utc::now());
        Observation::Changed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
