//! Blocking HTTP fetch layer for catalogs and artifacts.
//!
//! The [`Fetch`] trait is the seam between the updater and the network:
//! production code uses [`HttpFetch`], tests substitute an in-memory fake.

use std::time::Duration;

use super::{UpdateError, UpdateResult};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the raw bytes behind a URL.
pub trait Fetch {
    fn fetch(&self, url: &str) -> UpdateResult<Vec<u8>>;
}

/// Production fetcher over a blocking reqwest client.
pub struct HttpFetch {
    client: reqwest::blocking::Client,
}

impl HttpFetch {
    /// Build a client with a bounded per-request timeout.
    pub fn new(timeout: Duration) -> UpdateResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(format!("modkit/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpdateError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetch {
    fn fetch(&self, url: &str) -> UpdateResult<Vec<u8>> {
        let response =
            self.client.get(url).send().map_err(|e| UpdateError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UpdateError::Network(format!("HTTP {} from {url}", response.status())));
        }

        let bytes = response.bytes().map_err(|e| UpdateError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
