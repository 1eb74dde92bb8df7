//! HTTP transport for the lookup and download stages.
//!
//! Every request the pipeline makes goes through the [`Fetcher`] trait, so the
//! locator and image stages can be driven by canned responses in tests. The
//! production implementation, [`HttpFetcher`], wraps one `reqwest::Client`
//! shared by every request of a run.

use crate::error::{DeckError, FetchError};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// A source of response bodies keyed by URL.
///
/// Implementations must map every failure (timeout, non-success status,
/// connection error) to a [`FetchError`]; they never panic and never retry.
pub trait Fetcher {
    /// GET `url`, giving up after `timeout`.
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// [`Fetcher`] backed by `reqwest`, sending a fixed `User-Agent`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that identifies itself with `user_agent`.
    pub fn new(user_agent: &str) -> Result<Self, DeckError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DeckError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    secs: timeout.as_secs(),
                }
            } else {
                FetchError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(map_err)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(map_err)?;
        debug!("GET {} → {} bytes", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
