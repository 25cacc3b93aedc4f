//! Mapping settings and static metadata.
//!
//! The only user-facing setting is the API key. Base URLs are overridable so
//! tests can point the mapping at a mock server.

use crate::error::MappingError;

pub const DEFAULT_BASE_URL: &str = "http://transparencydata.com/api/1.0";
pub const DEFAULT_CONTEXTUALIZE_URL: &str = "https://inbox.influenceexplorer.com/contextualize";

pub const API_KEY_VAR: &str = "INFLUENCE_API_KEY";
pub const BASE_URL_VAR: &str = "INFLUENCE_BASE_URL";
pub const CONTEXTUALIZE_URL_VAR: &str = "INFLUENCE_CONTEXTUALIZE_URL";

/// Descriptive metadata shown by the host next to the data source.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MappingInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub authors: &'static str,
    pub homepage: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
}

pub const MAPPING_INFO: MappingInfo = MappingInfo {
    name: "Influence Explorer",
    version: env!("CARGO_PKG_VERSION"),
    authors: "Dan Drinkard",
    homepage: "http://datajam.org/datacards/influence-explorer",
    summary: "An API mapping to add Influence Explorer as a data source for card visualizations",
    description: "IMPORTANT NOTE: This mapping does automatic name resolution of individuals, \
                  organizations and politicians. You MUST verify your results independently.",
};

#[derive(Debug, Clone)]
pub struct Settings {
    /// Sunlight API key, sent as `apikey` on every aggregate and lookup call.
    pub api_key: Option<String>,
    /// Base URI of the aggregate API, without trailing slash.
    pub base_url: String,
    /// Full URL of the entity contextualization service.
    pub contextualize_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            contextualize_url: DEFAULT_CONTEXTUALIZE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. Unset or empty variables
    /// keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env_string(API_KEY_VAR),
            base_url: env_string(BASE_URL_VAR).unwrap_or(defaults.base_url),
            contextualize_url: env_string(CONTEXTUALIZE_URL_VAR)
                .unwrap_or(defaults.contextualize_url),
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_contextualize_url(mut self, url: &str) -> Self {
        self.contextualize_url = url.to_string();
        self
    }

    /// Returns the API key or a configuration error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, MappingError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(MappingError::Config(format!(
                "an API key is required; set {} or pass --api-key",
                API_KEY_VAR
            ))),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
