//! Endpoint declarations: parameters, response schemas and output fields.
//!
//! Descriptors are assembled with builders at start-up and never mutated
//! afterwards. Callbacks (validators, setters, getters, before-filters) are
//! plain function pointers stored in the structs.

use std::collections::HashSet;

use influence_api::UriTemplate;
use serde::Serialize;
use thiserror::Error;

use crate::choices::Choices;
use crate::error::{MappingError, TemplateError};
use crate::getters::{humanize, ValueGetter};
use crate::value::FieldFormat;

/// Predicate over a resolved parameter value.
pub type Validator = fn(&str) -> bool;

/// Whole-body rewrite applied before records are extracted.
pub type BeforeFilter = fn(&str) -> Result<String, MappingError>;

/// How a raw parameter value becomes the resolved value.
#[derive(Clone, Copy)]
pub enum Setter {
    /// A pure rewrite of the raw value.
    Transform(fn(&str) -> String),
    /// Free-text entity name to canonical id via the contextualization service.
    LookupEntity,
}

impl std::fmt::Debug for Setter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transform(_) => f.write_str("Transform(..)"),
            Self::LookupEntity => f.write_str("LookupEntity"),
        }
    }
}

/// Errors found while assembling descriptors into a registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("endpoint '{endpoint}': {source}")]
    Template {
        endpoint: String,
        #[source]
        source: TemplateError,
    },
    #[error("endpoint '{endpoint}' declares parameter '{param}' twice")]
    DuplicateParameter { endpoint: String, param: String },
    #[error("endpoint '{endpoint}' select parameter '{param}' has no options")]
    EmptyOptions { endpoint: String, param: String },
    #[error("endpoint '{0}' is registered twice")]
    DuplicateEndpoint(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Select,
    Integer,
}

#[derive(Clone, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub label: String,
    pub kind: ParamKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Choices::is_empty")]
    pub options: Choices,
    #[serde(skip)]
    pub validator: Option<Validator>,
    #[serde(skip)]
    pub setter: Option<Setter>,
}

impl ParameterSpec {
    fn new(name: &str, label: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            default: None,
            options: Choices::new(),
            validator: None,
            setter: None,
        }
    }

    pub fn string(name: &str, label: &str) -> Self {
        Self::new(name, label, ParamKind::String)
    }

    pub fn integer(name: &str, label: &str) -> Self {
        Self::new(name, label, ParamKind::Integer)
    }

    pub fn select(name: &str, label: &str, options: Choices) -> Self {
        let mut spec = Self::new(name, label, ParamKind::Select);
        spec.options = options;
        spec
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn setter(mut self, setter: Setter) -> Self {
        self.setter = Some(setter);
        self
    }
}

impl std::fmt::Debug for ParameterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("options", &self.options.len())
            .field("validator", &self.validator.is_some())
            .field("setter", &self.setter)
            .finish()
    }
}

/// One output column.
#[derive(Clone, Serialize)]
pub struct FieldSpec {
    /// Output field name in the resolved record.
    pub name: String,
    /// Key read from each upstream record.
    #[serde(skip)]
    pub source_key: String,
    pub label: String,
    pub format: FieldFormat,
    #[serde(skip)]
    pub getter: Option<ValueGetter>,
}

impl FieldSpec {
    /// A field read from and written to `key`, labelled with its humanized form.
    pub fn new(key: &str) -> Self {
        Self {
            name: key.to_string(),
            source_key: key.to_string(),
            label: humanize(key),
            format: FieldFormat::Plain,
            getter: None,
        }
    }

    /// Reads the value from a different upstream key than the output name.
    pub fn source(mut self, key: &str) -> Self {
        self.source_key = key.to_string();
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }

    pub fn getter(mut self, getter: ValueGetter) -> Self {
        self.getter = Some(getter);
        self
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("source_key", &self.source_key)
            .field("format", &self.format)
            .field("getter", &self.getter.is_some())
            .finish()
    }
}

#[derive(Clone, Default, Serialize)]
pub struct ResponseSchema {
    #[serde(skip)]
    pub before_filter: Option<BeforeFilter>,
    pub fields: Vec<FieldSpec>,
}

impl ResponseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn before_filter(mut self, filter: BeforeFilter) -> Self {
        self.before_filter = Some(filter);
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}

impl std::fmt::Debug for ResponseSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseSchema")
            .field("before_filter", &self.before_filter.is_some())
            .field("fields", &self.fields)
            .finish()
    }
}

/// A named, parameterized query against the aggregate API.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDescriptor {
    pub key: String,
    pub title: String,
    pub uri: UriTemplate,
    pub help_text: String,
    pub parameters: Vec<ParameterSpec>,
    pub response: ResponseSchema,
}

impl EndpointDescriptor {
    /// Starts declaring a GET endpoint.
    pub fn get(key: &str, title: &str) -> EndpointBuilder {
        EndpointBuilder {
            key: key.to_string(),
            title: title.to_string(),
            uri: String::new(),
            help_text: String::new(),
            parameters: Vec::new(),
            response: ResponseSchema::new(),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.response.fields
    }
}

pub struct EndpointBuilder {
    key: String,
    title: String,
    uri: String,
    help_text: String,
    parameters: Vec<ParameterSpec>,
    response: ResponseSchema,
}

impl EndpointBuilder {
    pub fn uri(mut self, template: &str) -> Self {
        self.uri = template.to_string();
        self
    }

    pub fn help_text(mut self, text: &str) -> Self {
        self.help_text = text.to_string();
        self
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn response(mut self, response: ResponseSchema) -> Self {
        self.response = response;
        self
    }

    /// Checks the declaration and freezes it.
    ///
    /// Every template placeholder must name a declared parameter, parameter
    /// names must be unique and select parameters must carry options.
    pub fn build(self) -> Result<EndpointDescriptor, DescriptorError> {
        let template_error = |source| DescriptorError::Template {
            endpoint: self.key.clone(),
            source,
        };
        let uri = UriTemplate::parse(&self.uri).map_err(template_error)?;

        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(DescriptorError::DuplicateParameter {
                    endpoint: self.key.clone(),
                    param: param.name.clone(),
                });
            }
            if param.kind == ParamKind::Select && param.options.is_empty() {
                return Err(DescriptorError::EmptyOptions {
                    endpoint: self.key.clone(),
                    param: param.name.clone(),
                });
            }
        }
        if let Some(placeholder) = uri.placeholders().find(|p| !seen.contains(p)) {
            return Err(template_error(TemplateError::UndeclaredPlaceholder {
                template: self.uri.clone(),
                placeholder: placeholder.to_string(),
            }));
        }

        Ok(EndpointDescriptor {
            key: self.key,
            title: self.title,
            uri,
            help_text: self.help_text,
            parameters: self.parameters,
            response: self.response,
        })
    }
}
