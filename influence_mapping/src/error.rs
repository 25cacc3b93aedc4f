//! Error types for the mapping layer.

use thiserror::Error;

pub use influence_api::TemplateError;

/// A resolved parameter value was rejected. Raised before any request to the
/// aggregate API is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("parameter '{param}' rejected value '{value}'")]
    Invalid { param: String, value: String },
    #[error("parameter '{param}' has no option '{value}'")]
    NotAnOption { param: String, value: String },
    #[error("parameter '{param}' expects an integer, got '{value}'")]
    NotAnInteger { param: String, value: String },
    #[error("parameter '{param}' is required")]
    Missing { param: String },
}

impl ParameterError {
    /// Name of the parameter that failed.
    pub fn param(&self) -> &str {
        match self {
            Self::Invalid { param, .. }
            | Self::NotAnOption { param, .. }
            | Self::NotAnInteger { param, .. }
            | Self::Missing { param } => param,
        }
    }
}

/// A strict field getter could not coerce its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field '{field}' could not coerce {value}: {reason}")]
pub struct CoercionError {
    pub field: String,
    /// The offending raw value, rendered as JSON.
    pub value: String,
    pub reason: String,
}

/// Errors produced by the mapping layer.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
    #[error("endpoint template error: {0}")]
    Template(#[from] TemplateError),
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[from] influence_api::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("field coercion failed: {0}")]
    FieldCoercion(#[from] CoercionError),
    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("reference table '{table}' could not be parsed: {reason}")]
    ReferenceTable { table: &'static str, reason: String },
}

impl From<serde_json::Error> for MappingError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}
