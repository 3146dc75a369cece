//! HTTP fetcher built on [`reqwest`]'s blocking client.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use super::{FetchError, Fetcher};

/// Fetches pages with a plain `GET`.
///
/// Any response that delivers a body counts as content, whatever its status
/// code; a non-2xx status is only logged.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Non-success status, comparing body anyway");
        }

        // `text()` consumes the response, so the connection goes back to the
        // pool (or is closed) on both arms below.
        let body = response.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        debug!(url, bytes = body.len(), "Fetched");
        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let result = self.get(url);
        if let Err(e) = &result {
            warn!(error = %e, "The website could not be reached");
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
