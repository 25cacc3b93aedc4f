//! The mapping facade: resolve parameters, fetch, normalize.

use std::sync::Arc;

use influence_api::{Client, Fetcher};
use url::Url;

use crate::choices::Choices;
use crate::descriptor::EndpointDescriptor;
use crate::error::MappingError;
use crate::normalize::normalize;
use crate::reference::{reference_tables, CrpCategory, ReferenceTables};
use crate::registry::Registry;
use crate::request::{build_url, resolve_parameters, EntityLookup, RawParams};
use crate::resolver::EntityResolver;
use crate::settings::{MappingInfo, Settings, MAPPING_INFO};
use crate::value::ResolvedRecord;

/// Entry point used by hosts: one call per endpoint invocation.
///
/// Calls are independent. The only shared state is the reference tables,
/// which default to the process-wide instance.
pub struct Mapping {
    settings: Settings,
    registry: Registry,
    fetcher: Arc<dyn Fetcher>,
    resolver: EntityResolver,
    tables: Arc<ReferenceTables>,
}

impl Mapping {
    /// Builds a mapping over the standard catalog and a plain HTTP client.
    pub fn new(settings: Settings) -> Result<Self, MappingError> {
        let registry = Registry::standard().map_err(|e| MappingError::Config(e.to_string()))?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(Client::new());
        let resolver = EntityResolver::new(fetcher.clone(), &settings.contextualize_url);
        Ok(Self {
            settings,
            registry,
            fetcher,
            resolver,
            tables: reference_tables(),
        })
    }

    /// Replaces the fetch collaborator for both aggregate and lookup calls.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.resolver = EntityResolver::new(fetcher.clone(), &self.settings.contextualize_url);
        self.fetcher = fetcher;
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Uses private reference tables instead of the process-wide ones.
    pub fn with_reference_tables(mut self, tables: Arc<ReferenceTables>) -> Self {
        self.tables = tables;
        self
    }

    pub fn info(&self) -> &'static MappingInfo {
        &MAPPING_INFO
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn endpoint(&self, key: &str) -> Result<&EndpointDescriptor, MappingError> {
        self.registry
            .get(key)
            .ok_or_else(|| MappingError::UnknownEndpoint(key.to_string()))
    }

    /// Resolves parameters and returns the request URL without fetching it.
    pub async fn build_request(&self, key: &str, raw: &RawParams) -> Result<Url, MappingError> {
        let endpoint = self.endpoint(key)?;
        let api_key = self.settings.require_api_key()?;
        let lookup = EntityLookup {
            resolver: &self.resolver,
            api_key,
        };
        let values = resolve_parameters(endpoint, raw, Some(&lookup)).await?;
        build_url(endpoint, &values, &self.settings.base_url, api_key)
    }

    /// Runs one endpoint and returns its normalized records.
    pub async fn call(
        &self,
        key: &str,
        raw: &RawParams,
    ) -> Result<Vec<ResolvedRecord>, MappingError> {
        let endpoint = self.endpoint(key)?;
        let url = self.build_request(key, raw).await?;
        let bytes = self.fetcher.fetch(&url).await?;
        let body = String::from_utf8(bytes)
            .map_err(|e| MappingError::MalformedResponse(format!("body is not UTF-8: {}", e)))?;
        let records = normalize(&body, &endpoint.response)?;
        tracing::info!("{} returned {} records", key, records.len());
        Ok(records)
    }

    /// Free text to entity id, falling back to the text itself.
    pub async fn resolve_entity(&self, text: &str) -> Result<String, MappingError> {
        let api_key = self.settings.require_api_key()?;
        Ok(self.resolver.resolve(text, api_key).await)
    }

    pub async fn crp_categories(&self) -> Result<Arc<Vec<CrpCategory>>, MappingError> {
        self.tables.crp_categories(self.fetcher.as_ref()).await
    }

    pub async fn ie_transaction_types(&self) -> Result<Arc<Choices>, MappingError> {
        self.tables.ie_transaction_types(self.fetcher.as_ref()).await
    }
}
