//! The polling loop.
//!
//! Runs on the main thread: snapshot every target once, then forever sleep,
//! recheck every target in order, and report changes.  Fetches are blocking
//! and sequential, so one cycle takes the sum of all fetch latencies plus
//! the interval.
//!
//! ## Shutdown
//!
//! The loop only stops when a [`Shutdown`] is requested.  The request is
//! honoured between targets and during the sleep; a fetch already in flight
//! runs to completion (bounded by the client timeout).

use std::cell::Cell;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::{App, Outcome};

/// Receiving end of a shutdown request.
pub struct Shutdown {
    rx: mpsc::Receiver<()>,
    requested: Cell<bool>,
}

impl Shutdown {
    /// A shutdown that fires once anything is sent on the returned sender.
    pub fn channel() -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel();
        let shutdown = Self {
            rx,
            requested: Cell::new(false),
        };
        (tx, shutdown)
    }

    /// A shutdown that fires on Ctrl-C.
    ///
    /// The signal is awaited on a background thread running a single-threaded
    /// tokio runtime.  If that cannot be set up the loop still runs, it just
    /// has to be killed.
    pub fn on_ctrl_c() -> Self {
        let (tx, shutdown) = Self::channel();
        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    warn!(error = %e, "Cannot listen for Ctrl-C");
                    return;
                }
            };
            if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
                info!("Ctrl-C received, finishing current step");
                let _ = tx.send(());
            }
        });
        shutdown
    }

    pub fn is_requested(&self) -> bool {
        if self.requested.get() {
            return true;
        }
        match self.rx.try_recv() {
            Ok(()) => {
                self.requested.set(true);
                true
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }

    /// Block for `duration` or until shutdown is requested.  Returns `true`
    /// if the wait ended because of a shutdown.
    fn wait(&self, duration: Duration) -> bool {
        if self.requested.get() {
            return true;
        }
        match self.rx.recv_timeout(duration) {
            Ok(()) => {
                self.requested.set(true);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            // Nobody can request a shutdown any more; plain sleep.
            Err(RecvTimeoutError::Disconnected) => {
                thread::sleep(duration);
                false
            }
        }
    }
}

/// Tally of one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl CycleSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Changed => self.changed += 1,
            Outcome::Unchanged | Outcome::Seeded => self.unchanged += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Initialize every target, then poll until shutdown.
pub fn run(app: &mut App, shutdown: &Shutdown) {
    initialize(app, shutdown);

    while !go_to_sleep(app.interval, shutdown) {
        let summary = run_cycle(app, shutdown);
        debug!(
            changed = summary.changed,
            unchanged = summary.unchanged,
            failed = summary.failed,
            "Cycle complete"
        );
        if shutdown.is_requested() {
            break;
        }
    }

    info!("Stopped watching {} targets", app.targets.len());
}

/// Take the initial snapshot of every target, in order.
pub fn initialize(app: &mut App, shutdown: &Shutdown) {
    for index in 0..app.targets.len() {
        if shutdown.is_requested() {
            return;
        }
        app.seed(index);
    }
}

/// One pass over all targets.
pub fn run_cycle(app: &mut App, shutdown: &Shutdown) -> CycleSummary {
    let mut summary = CycleSummary::default();
    for index in 0..app.targets.len() {
        if shutdown.is_requested() {
            break;
        }
        summary.record(app.check(index));
    }
    summary
}

fn go_to_sleep(interval: Duration, shutdown: &Shutdown) -> bool {
    if shutdown.is_requested() {
        return true;
    }
    info!("Going to sleep for {} seconds", interval.as_secs());
    shutdown.wait(interval)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
