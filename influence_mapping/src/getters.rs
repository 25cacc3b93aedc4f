//! Per-field value getters and the text helpers behind them.
//!
//! Getters receive the raw upstream value, null included, and return the
//! coerced value. Numeric getters are lenient (garbage becomes zero); the
//! date getter is strict and reports a reason instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::choices;
use crate::value::{format_delimited, FieldValue};

/// Signature shared by every field getter. `Err` carries the reason the raw
/// value was rejected.
pub type ValueGetter = fn(&Value) -> Result<FieldValue, String>;

/// Integer coercion: numbers truncate, strings use their leading integer,
/// anything else is zero.
pub fn to_count(value: &Value) -> i64 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
                .unwrap_or(0),
        },
        Value::String(s) => leading_integer(s),
        _ => 0,
    }
}

/// Float coercion: strings use their leading number, anything non-numeric
/// or non-finite is `0.0`.
pub fn to_currency(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_float(s),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit() && c != '_')
        .unwrap_or(digits.len());
    let cleaned: String = digits[..end].chars().filter(|c| *c != '_').collect();
    match cleaned.parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) if cleaned.is_empty() => 0,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            mantissa_digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// Lowercases, turns underscores into spaces and capitalizes the first letter
/// of every word. Letters after an apostrophe stay lowercase (`O'neil's`
/// keeps its `s`). Applying it twice gives the same result as once.
pub fn titleize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.to_lowercase().chars() {
        let c = if c == '_' { ' ' } else { c };
        let at_boundary = match prev {
            None => true,
            Some(p) => !p.is_alphanumeric() && !matches!(p, '\'' | '\u{2019}' | '`'),
        };
        let mut upper = c.to_uppercase();
        if at_boundary && c.is_alphabetic() && upper.len() == 1 {
            out.extend(upper.next());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Default display label for a field key: `employee_count` -> `Employee count`.
pub fn humanize(key: &str) -> String {
    let base = key.strip_suffix("_id").unwrap_or(key);
    let spaced = base.replace('_', " ").to_lowercase();
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn count(value: &Value) -> Result<FieldValue, String> {
    Ok(FieldValue::Integer(to_count(value)))
}

pub fn currency(value: &Value) -> Result<FieldValue, String> {
    Ok(FieldValue::Float(to_currency(value)))
}

pub fn title_case(value: &Value) -> Result<FieldValue, String> {
    Ok(match as_text(value) {
        Some(text) => FieldValue::Text(titleize(&text)),
        None => FieldValue::Null,
    })
}

/// Strict calendar-date parse. Accepts `YYYY-MM-DD`, RFC 3339 timestamps,
/// `YYYY-MM-DD HH:MM:SS` and `MM/DD/YYYY`.
pub fn date(value: &Value) -> Result<FieldValue, String> {
    let text = match value {
        Value::String(s) => s.trim(),
        Value::Null => return Err("missing date".to_string()),
        _ => return Err("expected a date string".to_string()),
    };
    parse_date(text)
        .map(FieldValue::Date)
        .ok_or_else(|| format!("unrecognized date '{}'", text))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(text, "%m/%d/%Y").ok()
}

/// `[count, amount]` rendered as `"12 contributions ($500.0)"`.
pub fn contribution_summary(value: &Value) -> Result<FieldValue, String> {
    match value {
        Value::Null => Ok(FieldValue::Null),
        Value::Array(pair) => {
            let count = pair.first().and_then(as_text).unwrap_or_default();
            let amount = pair.get(1).map(to_currency).unwrap_or(0.0);
            Ok(FieldValue::Text(format!(
                "{} contributions (${})",
                count,
                format_delimited(amount)
            )))
        }
        _ => Err("expected a [count, amount] pair".to_string()),
    }
}

/// Party code to name; unknown codes become null.
pub fn party_name(value: &Value) -> Result<FieldValue, String> {
    Ok(value
        .as_str()
        .and_then(choices::party_label)
        .map(|label| FieldValue::Text(label.to_string()))
        .unwrap_or(FieldValue::Null))
}

/// Party code to name; unknown or missing codes become `"Other"`.
pub fn party_name_or_other(value: &Value) -> Result<FieldValue, String> {
    let label = value.as_str().and_then(choices::party_label).unwrap_or("Other");
    Ok(FieldValue::Text(label.to_string()))
}

/// Office code to label, falling back to the title-cased code itself.
pub fn seat(value: &Value) -> Result<FieldValue, String> {
    Ok(match as_text(value) {
        Some(code) => FieldValue::Text(choices::seat_label(&code)),
        None => FieldValue::Null,
    })
}

/// FEC office letter to name; unknown letters become null.
pub fn fec_office(value: &Value) -> Result<FieldValue, String> {
    Ok(value
        .as_str()
        .and_then(choices::fec_office_label)
        .map(|label| FieldValue::Text(label.to_string()))
        .unwrap_or(FieldValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_is_lenient() {
        assert_eq!(to_count(&json!("14")), 14);
        assert_eq!(to_count(&json!(" 14 contributions")), 14);
        assert_eq!(to_count(&json!("-3")), -3);
        assert_eq!(to_count(&json!("12.9")), 12);
        assert_eq!(to_count(&json!(12.9)), 12);
        assert_eq!(to_count(&json!(7)), 7);
        assert_eq!(to_count(&json!("")), 0);
        assert_eq!(to_count(&json!("abc")), 0);
        assert_eq!(to_count(&json!(null)), 0);
        assert_eq!(to_count(&json!(true)), 0);
        assert_eq!(to_count(&json!([1, 2])), 0);
    }

    #[test]
    fn count_getter_never_fails() {
        for raw in [json!("x"), json!(null), json!({}), json!("")] {
            assert_eq!(count(&raw), Ok(FieldValue::Integer(0)));
        }
    }

    #[test]
    fn currency_is_lenient_and_finite() {
        assert_eq!(to_currency(&json!("35300.00")), 35300.0);
        assert_eq!(to_currency(&json!("12.5abc")), 12.5);
        assert_eq!(to_currency(&json!("1e3")), 1000.0);
        assert_eq!(to_currency(&json!(".5")), 0.5);
        assert_eq!(to_currency(&json!(45.5)), 45.5);
        assert_eq!(to_currency(&json!(3)), 3.0);
        assert_eq!(to_currency(&json!("")), 0.0);
        assert_eq!(to_currency(&json!("n/a")), 0.0);
        assert_eq!(to_currency(&json!(".")), 0.0);
        assert_eq!(to_currency(&json!(null)), 0.0);
        assert_eq!(to_currency(&json!("1e999")), 0.0);
        for raw in ["NaN", "inf", "-", "$5"] {
            let v = to_currency(&json!(raw));
            assert!(v.is_finite());
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn titleize_capitalizes_words() {
        assert_eq!(titleize("GOLDMAN SACHS"), "Goldman Sachs");
        assert_eq!(titleize("securities & investment"), "Securities & Investment");
        assert_eq!(titleize("american_bankers_assn"), "American Bankers Assn");
        assert_eq!(titleize("O'NEIL'S PAC"), "O'neil's Pac");
        assert_eq!(titleize("smith-jones, mary"), "Smith-Jones, Mary");
        assert_eq!(titleize("3m co"), "3m Co");
        assert_eq!(titleize(""), "");
    }

    #[test]
    fn titleize_is_idempotent() {
        for s in [
            "GOLDMAN SACHS",
            "mcdonald's corp",
            "state, other",
            "ÉCOLE polytechnique",
            "a_b-c d'e",
        ] {
            let once = titleize(s);
            assert_eq!(titleize(&once), once);
        }
    }

    #[test]
    fn title_case_getter_keeps_null() {
        assert_eq!(title_case(&json!(null)), Ok(FieldValue::Null));
        assert_eq!(
            title_case(&json!("NATIONAL ASSN OF REALTORS")),
            Ok(FieldValue::Text("National Assn Of Realtors".into()))
        );
    }

    #[test]
    fn humanize_field_keys() {
        assert_eq!(humanize("employee_count"), "Employee count");
        assert_eq!(humanize("in-state"), "In-state");
        assert_eq!(humanize("Individuals"), "Individuals");
        assert_eq!(humanize("committee_id"), "Committee");
    }

    #[test]
    fn date_is_strict() {
        let d = NaiveDate::from_ymd_opt(2012, 3, 31).unwrap();
        assert_eq!(date(&json!("2012-03-31")), Ok(FieldValue::Date(d)));
        assert_eq!(date(&json!("2012-03-31T00:00:00Z")), Ok(FieldValue::Date(d)));
        assert_eq!(date(&json!("2012-03-31 12:00:00")), Ok(FieldValue::Date(d)));
        assert_eq!(date(&json!("03/31/2012")), Ok(FieldValue::Date(d)));
        assert!(date(&json!("not a date")).is_err());
        assert!(date(&json!("2012-02-30")).is_err());
        assert!(date(&json!(null)).is_err());
        assert!(date(&json!(20120331)).is_err());
    }

    #[test]
    fn contribution_summary_renders_pair() {
        assert_eq!(
            contribution_summary(&json!([12, 500.0])),
            Ok(FieldValue::Text("12 contributions ($500.0)".into()))
        );
        assert_eq!(
            contribution_summary(&json!(["1204", "1234567.5"])),
            Ok(FieldValue::Text("1204 contributions ($1,234,567.5)".into()))
        );
        assert_eq!(
            contribution_summary(&json!([3, 2.5e16])),
            Ok(FieldValue::Text("3 contributions ($25,000,000,000,000,000.0)".into()))
        );
        assert_eq!(contribution_summary(&json!(null)), Ok(FieldValue::Null));
        assert!(contribution_summary(&json!("12")).is_err());
    }

    #[test]
    fn code_translations() {
        assert_eq!(party_name(&json!("D")), Ok(FieldValue::Text("Democrat".into())));
        assert_eq!(party_name(&json!("G")), Ok(FieldValue::Null));
        assert_eq!(
            party_name_or_other(&json!("G")),
            Ok(FieldValue::Text("Other".into()))
        );
        assert_eq!(
            party_name_or_other(&json!(null)),
            Ok(FieldValue::Text("Other".into()))
        );
        assert_eq!(
            seat(&json!("federal:house")),
            Ok(FieldValue::Text("US House of Representatives".into()))
        );
        assert_eq!(
            seat(&json!("state:other")),
            Ok(FieldValue::Text("State, Other".into()))
        );
        assert_eq!(fec_office(&json!("S")), Ok(FieldValue::Text("Senate".into())));
        assert_eq!(fec_office(&json!("Z")), Ok(FieldValue::Null));
    }
}
