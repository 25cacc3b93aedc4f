//! HTTP client for the Transparency Data aggregate API and its companion services.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::{fetch::Fetcher, Error};

const USER_AGENT: &str = concat!("influence-explorer-mapping/", env!("CARGO_PKG_VERSION"));

/// Request timeout for every upstream call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used for the aggregate API, the contextualization service and
/// the static reference files.
///
/// Each request builds a fresh `reqwest::Client` with a 30-second timeout.
/// Failures are reported once; there is no retry.
#[derive(Debug, Clone, Default)]
pub struct Client;

impl Client {
    pub fn new() -> Self {
        Self
    }

    /// Joins a base URL and an absolute path (`/aggregates/...`).
    ///
    /// The base may carry a path prefix (`http://host/api/1.0`); the path is
    /// appended to it rather than replacing it.
    pub fn join(base: &str, path: &str) -> Result<Url, Error> {
        let joined = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(format!("{}: {}", joined, e))
        })
    }

    async fn get(&self, url: &Url) -> Result<Vec<u8>, Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;

        tracing::debug!("GET {}", redact_api_key(url));
        let resp = client.get(url.clone()).send().await.map_err(|e| {
            tracing::error!("Failed to get resource: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&String::from_utf8_lossy(&body));
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body.to_vec())
    }
}

#[async_trait]
impl Fetcher for Client {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, Error> {
        self.get(url).await
    }
}

/// Replaces the `apikey` query value so keys never reach the logs.
pub fn redact_api_key(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "apikey") {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apikey" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
