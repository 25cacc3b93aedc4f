//! Transport layer for the Influence Explorer mapping: an HTTP client behind a
//! [`Fetcher`] seam, path templates and query-string assembly.

mod client;
mod errors;
mod fetch;
mod query;
mod template;
pub use self::client::{redact_api_key, Client};
pub use self::errors::{Error, TemplateError};
pub use self::fetch::Fetcher;
pub use self::query::{Query, QueryPairs};
pub use self::template::UriTemplate;
