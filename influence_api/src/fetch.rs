//! The transport seam: anything that can turn a URL into response bytes.

use async_trait::async_trait;
use url::Url;

use crate::Error;

/// Performs an HTTP GET and returns the raw body of a successful response.
///
/// Implementations must surface non-2xx responses as [`Error::HttpStatus`]
/// and never retry on their own.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, Error>;

    /// Fetches and decodes the body as UTF-8, replacing invalid sequences.
    async fn fetch_text(&self, url: &Url) -> Result<String, Error> {
        let bytes = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
