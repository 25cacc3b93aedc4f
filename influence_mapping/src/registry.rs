//! Append-only registry of endpoint descriptors keyed by endpoint key.

use indexmap::IndexMap;

use crate::choices::current_year;
use crate::descriptor::{DescriptorError, EndpointDescriptor};
use crate::endpoints;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    endpoints: IndexMap<String, EndpointDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full Influence Explorer catalog with cycles up to this year.
    pub fn standard() -> Result<Self, DescriptorError> {
        Self::standard_for_year(current_year())
    }

    pub fn standard_for_year(current_year: i32) -> Result<Self, DescriptorError> {
        Self::from_descriptors(endpoints::all(current_year)?)
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = EndpointDescriptor>,
    ) -> Result<Self, DescriptorError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Adds an endpoint. Keys are never replaced.
    pub fn register(&mut self, descriptor: EndpointDescriptor) -> Result<(), DescriptorError> {
        if self.endpoints.contains_key(&descriptor.key) {
            return Err(DescriptorError::DuplicateEndpoint(descriptor.key));
        }
        self.endpoints.insert(descriptor.key.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.values()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(key: &str) -> EndpointDescriptor {
        EndpointDescriptor::get(key, key).uri("/x.json").build().unwrap()
    }

    #[test]
    fn keeps_registration_order() {
        let registry = Registry::from_descriptors([descriptor("b"), descriptor("a")]).unwrap();
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = Registry::from_descriptors([descriptor("a"), descriptor("a")]).unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateEndpoint("a".to_string()));
    }

    #[test]
    fn standard_catalog_starts_with_politicians() {
        let registry = Registry::standard_for_year(2012).unwrap();
        assert_eq!(registry.len(), 32);
        assert_eq!(registry.keys().next(), Some("politician_contributors"));
        assert_eq!(registry.keys().last(), Some("top_industries"));
    }
}
