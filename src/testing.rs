//! In-memory fakes shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::report::Reporter;
use crate::source::{FetchError, Fetcher};
use crate::target::Target;

/// Replays a queue of canned responses per URL.  An exhausted queue behaves
/// like an unreachable host.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    responses: Arc<Mutex<HashMap<String, VecDeque<Option<String>>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    /// Queue the next response for `url`; `None` means the fetch fails.
    pub fn push(&self, url: &str, response: Option<&str>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response.map(String::from));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .flatten()
            .ok_or_else(|| FetchError::Unavailable {
                url: url.to_string(),
                reason: "scripted failure".into(),
            })
    }
}

/// Remembers the name of every target it was asked to report.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    reported: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn reported(&self) -> Vec<String> {
        self.reported.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, target: &Target) {
        self.reported.lock().unwrap().push(target.name.clone());
    }
}
