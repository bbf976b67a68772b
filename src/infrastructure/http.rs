// SPDX-License-Identifier: MPL-2.0
//! `reqwest` adapter implementing the [`BlobFetcher`] port trait.
//!
//! [`BlobFetcher`]: crate::application::port::BlobFetcher

use crate::application::port::BlobFetcher;
use std::future::Future;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP(S) fetcher sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds the client with a redirect limit, timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error message if the TLS backend fails to
    /// initialize.
    pub fn new() -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("IrisLens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { client })
    }
}

impl BlobFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, String>> + Send {
        let request = self.client.get(url);
        async move {
            let response = request.send().await.map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("HTTP status: {}", response.status()));
            }
            let bytes = response.bytes().await.map_err(|e| e.to_string())?;
            Ok(bytes.to_vec())
        }
    }
}
