//! Content fetching abstraction.
//!
//! This module defines the [`Fetcher`] trait and the [`FetchError`] it
//! returns.  The concrete HTTP implementation lives in [`http`].
//!
//! ## For contributors — adding a new fetcher
//!
//! 1. Create a new file in this directory (e.g. `file.rs`).
//! 2. Define a struct and implement [`Fetcher`] for it.
//! 3. Add `mod file;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of (or next to) [`HttpFetcher`].
//!
//! The poll loop, sanitizer and reporter never look at where content came
//! from, only at the string a fetcher hands back.

mod http;

pub use http::HttpFetcher;

use thiserror::Error;

/// Why a single fetch produced no content.
///
/// Every variant is recoverable: the poll loop leaves the target untouched
/// and tries again next cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A response arrived but its body could not be read as text.
    #[error("reading body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other reason a fetcher could not deliver content.
    #[error("{url} is unavailable: {reason}")]
    Unavailable { url: String, reason: String },
}

/// Trait that every content source must implement.
///
/// The poll loop calls [`fetch()`](Fetcher::fetch) once per target per cycle,
/// sequentially, and blocks until it returns.
pub trait Fetcher: Send {
    /// Fetch the raw, unsanitized content at `url`.
    ///
    /// Implementations must not retry and must release any connection before
    /// returning.  Failures are logged by the implementation itself so the
    /// caller can treat them as "nothing new this cycle".
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
