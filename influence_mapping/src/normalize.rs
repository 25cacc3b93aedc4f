//! Turns raw response bodies into ordered [`ResolvedRecord`]s.
//!
//! A body first goes through the endpoint's before-filter (if any), is then
//! decoded as either a list of objects or a single object, and finally every
//! declared field is projected out of each object in declaration order.

use serde_json::{json, Map, Value};

use crate::descriptor::{FieldSpec, ResponseSchema};
use crate::error::{CoercionError, MappingError};
use crate::getters::{to_count, to_currency};
use crate::value::{FieldValue, ResolvedRecord};

const PARTY_KEYS: &[&str] = &["Democrats", "Republicans", "Other"];
const LEVEL_KEYS: &[&str] = &["Federal", "State"];

/// Normalizes one response body against `schema`.
pub fn normalize(raw: &str, schema: &ResponseSchema) -> Result<Vec<ResolvedRecord>, MappingError> {
    let rows = match schema.before_filter {
        Some(filter) => decode_rows(&filter(raw)?)?,
        None => decode_rows(raw)?,
    };
    rows.iter()
        .map(|row| project(row, &schema.fields))
        .collect()
}

fn decode_rows(text: &str) -> Result<Vec<Map<String, Value>>, MappingError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(MappingError::MalformedResponse(format!(
                    "record {} is {}, expected an object",
                    i,
                    json_kind(&other)
                ))),
            })
            .collect(),
        Value::Object(map) => Ok(vec![map]),
        other => Err(MappingError::MalformedResponse(format!(
            "expected a list of records or a single record, got {}",
            json_kind(&other)
        ))),
    }
}

fn project(row: &Map<String, Value>, fields: &[FieldSpec]) -> Result<ResolvedRecord, MappingError> {
    let mut record = ResolvedRecord::new();
    for field in fields {
        let raw = row.get(&field.source_key).unwrap_or(&Value::Null);
        let value = match field.getter {
            Some(getter) => getter(raw).map_err(|reason| CoercionError {
                field: field.name.clone(),
                value: raw.to_string(),
                reason,
            })?,
            None => FieldValue::from_json(raw),
        };
        record.insert(&field.name, value);
    }
    Ok(record)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Wraps a bare JSON object in a one-element array. Arrays pass through.
pub fn wrap_in_array(text: &str) -> Result<String, MappingError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(_) => Ok(text.to_string()),
        other => Ok(Value::Array(vec![other]).to_string()),
    }
}

/// Pivots `{"Democrats": [n, a], "Republicans": [n, a], "Other": [n, a]}`
/// into `party`/`count`/`amount` rows in that fixed order.
pub fn pivot_party_breakdown(text: &str) -> Result<String, MappingError> {
    pivot_breakdown(text, PARTY_KEYS)
}

/// Pivots the `Federal`/`State` breakdown the same way. The discriminator
/// column is still called `party`.
pub fn pivot_level_breakdown(text: &str) -> Result<String, MappingError> {
    pivot_breakdown(text, LEVEL_KEYS)
}

/// Keys that are absent, or whose value is not a `[count, amount]` array,
/// produce no row.
fn pivot_breakdown(text: &str, keys: &[&str]) -> Result<String, MappingError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or_else(|| {
        MappingError::MalformedResponse(format!(
            "breakdown should be an object, got {}",
            json_kind(&value)
        ))
    })?;

    let rows: Vec<Value> = keys
        .iter()
        .filter_map(|key| {
            let Some(pair) = object.get(*key).and_then(Value::as_array) else {
                tracing::debug!("Breakdown has no usable '{}' entry", key);
                return None;
            };
            Some(json!({
                "party": key,
                "count": pair.first().map(to_count).unwrap_or(0),
                "amount": pair.get(1).map(to_currency).unwrap_or(0.0),
            }))
        })
        .collect();
    Ok(Value::Array(rows).to_string())
}
