//! Influence Explorer mapping: endpoint catalog, parameter resolution and
//! response normalization for the Sunlight aggregate campaign-finance API.
//!
//! Built on the `influence_api` HTTP layer. [`Mapping`] is the usual entry
//! point; the descriptor, request and normalize modules can also be used on
//! their own.

pub mod choices;
pub mod descriptor;
pub mod endpoints;
pub mod error;
pub mod getters;
pub mod mapping;
pub mod normalize;
pub mod reference;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod settings;
pub mod value;

pub use influence_api;

pub use descriptor::{
    DescriptorError, EndpointDescriptor, FieldSpec, ParamKind, ParameterSpec, ResponseSchema,
    Setter,
};
pub use error::{CoercionError, MappingError, ParameterError, TemplateError};
pub use mapping::Mapping;
pub use normalize::normalize;
pub use reference::{reset_reference_tables, CrpCategory, ReferenceTables};
pub use registry::Registry;
pub use request::{RawParams, ResolvedParams};
pub use resolver::EntityResolver;
pub use settings::{MappingInfo, Settings, MAPPING_INFO};
pub use value::{FieldFormat, FieldValue, ResolvedRecord};
