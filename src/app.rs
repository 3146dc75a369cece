use std::time::Duration;

use tracing::{info, warn};

use crate::config::Config;
use crate::report::Reporter;
use crate::sanitize::Sanitizer;
use crate::source::Fetcher;
use crate::target::{Observation, Target};

/// What happened to one target during one step of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Initial snapshot taken.
    Seeded,
    /// Fetch failed; the target was left as it was.
    Failed,
    Unchanged,
    /// Snapshot replaced and the reporter notified.
    Changed,
}

/// Owns the watched targets and the collaborators used to check them.
///
/// Replaces what would otherwise be process-wide state: several `App`s can
/// coexist (the tests rely on that).
pub struct App {
    /// Watched pages, in poll order.
    pub targets: Vec<Target>,
    /// Pause between cycles.
    pub interval: Duration,
    fetcher: Box<dyn Fetcher>,
    sanitizer: Box<dyn Sanitizer>,
    reporter: Box<dyn Reporter>,
}

impl App {
    pub fn new(
        targets: Vec<Target>,
        interval: Duration,
        fetcher: Box<dyn Fetcher>,
        sanitizer: Box<dyn Sanitizer>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            targets,
            interval,
            fetcher,
            sanitizer,
            reporter,
        }
    }

    pub fn from_config(
        config: &Config,
        fetcher: Box<dyn Fetcher>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self::new(
            config.build_targets(),
            config.interval(),
            fetcher,
            config.sanitizer.build(),
            reporter,
        )
    }

    /// Take the initial snapshot of the target at `index`.
    ///
    /// On failure the snapshot stays empty.  One log line either way.
    pub fn seed(&mut self, index: usize) -> Outcome {
        let content = self.fetch_sanitized(index);
        let target = &mut self.targets[index];
        match content {
            Some(content) => {
                target.seed(content);
                info!("Created initial snapshot for {}", target.name);
                Outcome::Seeded
            }
            None => {
                warn!("No initial snapshot for {}, starting empty", target.name);
                Outcome::Failed
            }
        }
    }

    /// Refetch the target at `index`, compare, and report a change.
    pub fn check(&mut self, index: usize) -> Outcome {
        let Some(content) = self.fetch_sanitized(index) else {
            return Outcome::Failed;
        };
        let target = &mut self.targets[index];
        match target.observe(content) {
            Observation::Changed => {
                self.reporter.report(target);
                Outcome::Changed
            }
            Observation::Unchanged => {
                info!("No changes for {}", target.name);
                Outcome::Unchanged
            }
        }
    }

    fn fetch_sanitized(&self, index: usize) -> Option<String> {
        let raw = self.fetcher.fetch(&self.targets[index].url).ok()?;
        Some(self.sanitizer.sanitize(&raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
