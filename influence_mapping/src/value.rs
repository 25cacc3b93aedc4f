//! Coerced field values, normalized records and their display formatting.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Semantic display tag attached to an output field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    #[default]
    Plain,
    Currency,
    Date,
}

/// A single coerced value in a [`ResolvedRecord`].
///
/// Getters produce typed variants; fields without a getter carry the upstream
/// JSON through unchanged (`Text` for strings, `Json` for arrays and objects).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Json(Value),
}

impl FieldValue {
    /// Wraps a raw upstream value without coercion.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Null),
            },
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Json(other.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Renders the value for a table cell according to its field format.
    pub fn display(&self, format: FieldFormat) -> String {
        match (self, format) {
            (Self::Null, _) => String::new(),
            (Self::Float(f), FieldFormat::Currency) => format_currency(*f),
            (Self::Integer(i), FieldFormat::Currency) => format_currency(*i as f64),
            (Self::Text(s), FieldFormat::Currency) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => format_currency(f),
                _ => s.clone(),
            },
            (Self::Bool(b), _) => b.to_string(),
            (Self::Integer(i), _) => i.to_string(),
            (Self::Float(f), _) => format!("{:?}", f),
            (Self::Text(s), _) => s.clone(),
            (Self::Date(d), _) => d.format("%Y-%m-%d").to_string(),
            (Self::Json(v), _) => v.to_string(),
        }
    }
}

/// One normalized output row: output field name to coerced value, in field
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedRecord {
    fields: IndexMap<String, FieldValue>,
}

impl ResolvedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Inserts thousands separators into the integer digits of a number string.
///
/// Signs and fractional parts are left alone: `-1234567.25` becomes
/// `-1,234,567.25`.
pub fn format_number(num: &str) -> String {
    let (sign, rest) = match num.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", num),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        return num.to_string();
    }

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Float with separators, keeping at least one fractional digit
/// (`500.0`, `1,234,567.5`).
pub fn format_delimited(amount: f64) -> String {
    let mut plain = format!("{}", amount);
    if amount.is_finite() && !plain.contains('.') {
        plain.push_str(".0");
    }
    format_number(&plain)
}

/// Currency display: `$` marker, separators, two decimals.
pub fn format_currency(amount: f64) -> String {
    let formatted = format_number(&format!("{:.2}", amount.abs()));
    if amount < 0.0 {
        format!("-${}", formatted)
    } else {
        format!("${}", formatted)
    }
}
