//! Entity name resolution through the contextualization service.

use std::sync::Arc;

use influence_api::{Fetcher, Query, QueryPairs};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Deserialize)]
struct ContextualizeResponse {
    #[serde(default)]
    entities: Vec<ContextEntity>,
}

#[derive(Debug, Deserialize)]
struct ContextEntity {
    entity_data: EntityData,
}

#[derive(Debug, Deserialize)]
struct EntityData {
    id: String,
}

#[derive(Error, Debug)]
enum LookupError {
    #[error("invalid lookup URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Fetch(#[from] influence_api::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no entity matched")]
    NoMatch,
}

/// Resolves free text (a politician, organization or individual name) to the
/// canonical hexadecimal entity id.
///
/// Resolution never fails: when the service is unreachable or has no match,
/// the input comes back unchanged so callers can pass ids directly.
pub struct EntityResolver {
    fetcher: Arc<dyn Fetcher>,
    contextualize_url: String,
}

impl EntityResolver {
    pub fn new(fetcher: Arc<dyn Fetcher>, contextualize_url: &str) -> Self {
        Self {
            fetcher,
            contextualize_url: contextualize_url.to_string(),
        }
    }

    pub async fn resolve(&self, text: &str, api_key: &str) -> String {
        match self.lookup(text, api_key).await {
            Ok(id) => {
                tracing::debug!("Resolved '{}' to entity {}", text, id);
                id
            }
            Err(e) => {
                tracing::warn!("Entity lookup for '{}' failed, using input as-is: {}", text, e);
                text.to_string()
            }
        }
    }

    async fn lookup(&self, text: &str, api_key: &str) -> Result<String, LookupError> {
        let url = QueryPairs::new()
            .with_pair("apikey", api_key)
            .with_pair("text", text)
            .add_to_url(&Url::parse(&self.contextualize_url)?);
        let body = self.fetcher.fetch(&url).await?;
        let parsed: ContextualizeResponse = serde_json::from_slice(&body)?;
        parsed
            .entities
            .into_iter()
            .next()
            .map(|e| e.entity_data.id)
            .ok_or(LookupError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct StubFetcher {
        body: Result<&'static str, u16>,
        seen: Mutex<Vec<Url>>,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, influence_api::Error> {
            self.seen.lock().unwrap().push(url.clone());
            match self.body {
                Ok(body) => Ok(body.as_bytes().to_vec()),
                Err(status) => Err(influence_api::Error::HttpStatus {
                    status,
                    body: String::new(),
                }),
            }
        }
    }

    fn resolver(body: Result<&'static str, u16>) -> (EntityResolver, Arc<StubFetcher>) {
        let stub = Arc::new(StubFetcher {
            body,
            seen: Mutex::new(Vec::new()),
        });
        let resolver = EntityResolver::new(stub.clone(), "http://lookup.test/contextualize");
        (resolver, stub)
    }

    #[tokio::test]
    async fn returns_first_entity_id() {
        let (r, stub) = resolver(Ok(
            r#"{"entities":[{"entity_data":{"id":"85ab2e74589a414495d18cc7a9233981"}},{"entity_data":{"id":"ff"}}]}"#,
        ));
        assert_eq!(
            r.resolve("Nancy Pelosi", "k").await,
            "85ab2e74589a414495d18cc7a9233981"
        );
        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query(), Some("apikey=k&text=Nancy+Pelosi"));
    }

    #[tokio::test]
    async fn service_error_falls_back_to_input() {
        let (r, _) = resolver(Err(503));
        assert_eq!(r.resolve("Nancy Pelosi", "k").await, "Nancy Pelosi");
    }

    #[tokio::test]
    async fn malformed_json_falls_back_to_input() {
        let (r, _) = resolver(Ok("<html>oops</html>"));
        assert_eq!(r.resolve("Goldman Sachs", "k").await, "Goldman Sachs");
    }

    #[tokio::test]
    async fn missing_path_falls_back_to_input() {
        for body in [
            r#"{"entities":[]}"#,
            r#"{}"#,
            r#"{"entities":[{"entity_data":{}}]}"#,
            r#"{"entities":[{"entity_data":{"id":42}}]}"#,
        ] {
            let (r, _) = resolver(Ok(body));
            assert_eq!(r.resolve("abc123", "k").await, "abc123");
        }
    }

    #[tokio::test]
    async fn bad_lookup_url_falls_back_to_input() {
        let stub = Arc::new(StubFetcher {
            body: Ok("{}"),
            seen: Mutex::new(Vec::new()),
        });
        let r = EntityResolver::new(stub.clone(), "not a url");
        assert_eq!(r.resolve("x", "k").await, "x");
        assert!(stub.seen.lock().unwrap().is_empty());
    }
}
