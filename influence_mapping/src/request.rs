//! Parameter resolution and request URL construction.

use std::collections::HashMap;

use indexmap::IndexMap;
use influence_api::{Client, Query, QueryPairs};
use url::Url;

use crate::descriptor::{EndpointDescriptor, ParamKind, ParameterSpec, Setter};
use crate::error::{MappingError, ParameterError};
use crate::resolver::EntityResolver;

/// Raw caller input, keyed by parameter name.
pub type RawParams = HashMap<String, String>;

/// Resolved parameter values in declaration order.
pub type ResolvedParams = IndexMap<String, String>;

/// What [`Setter::LookupEntity`] needs to reach the contextualization service.
pub struct EntityLookup<'a> {
    pub resolver: &'a EntityResolver,
    pub api_key: &'a str,
}

/// Runs every declared parameter through default, setter, validator and type
/// checks, in that order.
///
/// Empty or whitespace-only raw values count as omitted. An omitted
/// parameter with no default is skipped, unless the URI template needs it.
/// Without an `entity` context, lookup setters pass the value through.
pub async fn resolve_parameters(
    endpoint: &EndpointDescriptor,
    raw: &RawParams,
    entity: Option<&EntityLookup<'_>>,
) -> Result<ResolvedParams, MappingError> {
    for name in raw.keys() {
        if endpoint.parameter(name).is_none() {
            tracing::debug!("Ignoring unknown parameter '{}' for {}", name, endpoint.key);
        }
    }

    let mut resolved = ResolvedParams::new();
    for param in &endpoint.parameters {
        let candidate = raw
            .get(&param.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| param.default.clone());

        let Some(candidate) = candidate else {
            if endpoint.uri.has_placeholder(&param.name) {
                return Err(ParameterError::Missing {
                    param: param.name.clone(),
                }
                .into());
            }
            continue;
        };

        let value = apply_setter(param, candidate, entity).await;
        check(param, &value)?;
        resolved.insert(param.name.clone(), value);
    }
    Ok(resolved)
}

async fn apply_setter(
    param: &ParameterSpec,
    candidate: String,
    entity: Option<&EntityLookup<'_>>,
) -> String {
    match (param.setter, entity) {
        (Some(Setter::Transform(f)), _) => f(&candidate),
        (Some(Setter::LookupEntity), Some(lookup)) => {
            lookup.resolver.resolve(&candidate, lookup.api_key).await
        }
        (Some(Setter::LookupEntity), None) | (None, _) => candidate,
    }
}

fn check(param: &ParameterSpec, value: &str) -> Result<(), ParameterError> {
    if let Some(validator) = param.validator {
        if !validator(value) {
            return Err(ParameterError::Invalid {
                param: param.name.clone(),
                value: value.to_string(),
            });
        }
    }
    match param.kind {
        ParamKind::Select if !param.options.contains_key(value) => Err(ParameterError::NotAnOption {
            param: param.name.clone(),
            value: value.to_string(),
        }),
        ParamKind::Integer if value.parse::<i64>().is_err() => Err(ParameterError::NotAnInteger {
            param: param.name.clone(),
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Builds the request URL: placeholders are substituted into the path, the
/// remaining parameters become query pairs, and `apikey` is appended last.
pub fn build_url(
    endpoint: &EndpointDescriptor,
    values: &ResolvedParams,
    base_url: &str,
    api_key: &str,
) -> Result<Url, MappingError> {
    let path = endpoint.uri.expand(|name| values.get(name))?;
    let url = Client::join(base_url, &path).map_err(|e| MappingError::Config(e.to_string()))?;

    let mut query = QueryPairs::new();
    for (name, value) in values {
        if !endpoint.uri.has_placeholder(name) {
            query.push(name, value);
        }
    }
    query.push("apikey", api_key);
    Ok(query.add_to_url(&url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::parties;
    use crate::descriptor::ResponseSchema;

    fn is_hex(v: &str) -> bool {
        !v.is_empty() && v.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    fn upper(v: &str) -> String {
        v.to_uppercase()
    }

    fn contributors() -> EndpointDescriptor {
        EndpointDescriptor::get("politician_contributors", "Politician - Contributors")
            .uri("/aggregates/pol/:entity_id/contributors.json")
            .param(ParameterSpec::string("entity_id", "Politician").validate(is_hex))
            .param(ParameterSpec::integer("limit", "Number of Results").default_value("10"))
            .response(ResponseSchema::new())
            .build()
            .unwrap()
    }

    fn raw(pairs: &[(&str, &str)]) -> RawParams {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn builds_path_from_resolved_entity_id() {
        let endpoint = contributors();
        let values = resolve_parameters(&endpoint, &raw(&[("entity_id", "abc123")]), None)
            .await
            .unwrap();
        let url = build_url(&endpoint, &values, "http://transparencydata.com/api/1.0", "k").unwrap();

        assert_eq!(url.path(), "/api/1.0/aggregates/pol/abc123/contributors.json");
        assert_eq!(url.query(), Some("limit=10&apikey=k"));
        assert_eq!(
            endpoint.uri.expand(|name| values.get(name)).unwrap(),
            "/aggregates/pol/abc123/contributors.json"
        );
    }

    #[tokio::test]
    async fn validator_sees_resolved_value() {
        let endpoint = contributors();
        let err = resolve_parameters(&endpoint, &raw(&[("entity_id", "Nancy Pelosi")]), None)
            .await
            .unwrap_err();
        match err {
            MappingError::InvalidParameter(ParameterError::Invalid { param, value }) => {
                assert_eq!(param, "entity_id");
                assert_eq!(value, "Nancy Pelosi");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn select_outside_options_fails() {
        let endpoint = EndpointDescriptor::get("by_party", "By Party")
            .uri("/party/:party.json")
            .param(ParameterSpec::select("party", "Party", parties()))
            .build()
            .unwrap();
        let err = resolve_parameters(&endpoint, &raw(&[("party", "G")]), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidParameter(ParameterError::NotAnOption { .. })
        ));
    }

    #[tokio::test]
    async fn integer_parameters_must_parse() {
        let endpoint = contributors();
        let err = resolve_parameters(
            &endpoint,
            &raw(&[("entity_id", "abc123"), ("limit", "ten")]),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidParameter(ParameterError::NotAnInteger { .. })
        ));
    }

    #[tokio::test]
    async fn missing_placeholder_parameter_is_reported() {
        let endpoint = contributors();
        let err = resolve_parameters(&endpoint, &raw(&[("entity_id", "   ")]), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::InvalidParameter(ParameterError::Missing { ref param }) if param == "entity_id"
        ));
    }

    #[tokio::test]
    async fn default_goes_through_setter() {
        let endpoint = EndpointDescriptor::get("shout", "Shout")
            .uri("/shout/:word.json")
            .param(
                ParameterSpec::string("word", "Word")
                    .default_value("hello")
                    .setter(Setter::Transform(upper)),
            )
            .build()
            .unwrap();
        let values = resolve_parameters(&endpoint, &RawParams::new(), None).await.unwrap();
        assert_eq!(values.get("word").map(String::as_str), Some("HELLO"));
    }

    #[tokio::test]
    async fn omitted_optional_parameter_is_skipped() {
        let endpoint = EndpointDescriptor::get("list", "List")
            .uri("/list.json")
            .param(ParameterSpec::string("cycle", "Cycle"))
            .build()
            .unwrap();
        let values = resolve_parameters(&endpoint, &raw(&[("bogus", "1")]), None).await.unwrap();
        assert!(values.is_empty());
        let url = build_url(&endpoint, &values, "http://localhost/api", "k").unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/list.json?apikey=k");
    }

    #[tokio::test]
    async fn path_values_are_escaped() {
        let endpoint = EndpointDescriptor::get("echo", "Echo")
            .uri("/echo/:text.json")
            .param(ParameterSpec::string("text", "Text"))
            .build()
            .unwrap();
        let values = resolve_parameters(&endpoint, &raw(&[("text", "a b/c")]), None)
            .await
            .unwrap();
        let url = build_url(&endpoint, &values, "http://localhost", "k").unwrap();
        assert_eq!(url.path(), "/echo/a%20b%2Fc.json");
    }

    #[tokio::test]
    async fn dot_segment_values_cannot_leave_the_path() {
        let endpoint = EndpointDescriptor::get("nested", "Nested")
            .uri("/a/:v/b.json")
            .param(ParameterSpec::string("v", "Value"))
            .build()
            .unwrap();
        let values = resolve_parameters(&endpoint, &raw(&[("v", "..")]), None)
            .await
            .unwrap();
        let err = build_url(&endpoint, &values, "http://h/api/1.0", "k").unwrap_err();
        assert!(matches!(
            err,
            MappingError::Template(influence_api::TemplateError::DotSegment { ref placeholder, .. })
                if placeholder == "v"
        ));
    }
}
