//! Boundary conversion from unchecked input to [`TaggedValue`].
//!
//! This is the only place runtime type inspection happens. JSON is inspected
//! the way `typeof`, `instanceof` and `in` checks would inspect an untyped
//! value, and anything outside the closed union is rejected with
//! [`NarrowError::UnreachableVariant`].
//!
//! | JSON input                               | Tagged as              |
//! |------------------------------------------|------------------------|
//! | string                                   | `Text`                 |
//! | number                                   | `Number`               |
//! | `[a, b]` of strings, numbers, booleans   | `Pair`                 |
//! | `{"$date": "<date literal>"}`            | `DateOrText(Date)`     |
//! | `{"$text": "<string>"}`                  | `DateOrText(Text)`     |

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::patterns;
use crate::types::{Operand, TaggedValue};
use crate::NarrowError;

/// Key marking an object as a date instance.
pub const DATE_KEY: &str = "$date";

/// Key marking an object as text in date-or-text position.
pub const TEXT_KEY: &str = "$text";

/// Type guard: is this input textual?
pub fn is_text(value: &Value) -> bool {
    value.is_string()
}

/// Type guard: is this input numeric?
pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

/// Type guard: is this input a date instance with a parseable literal?
pub fn is_date_literal(value: &Value) -> bool {
    date_literal(value)
        .map(|text| parse_date(text).is_ok())
        .unwrap_or(false)
}

impl TaggedValue {
    /// Convert unchecked input into the closed union.
    pub fn from_unchecked(value: &Value) -> Result<Self, NarrowError> {
        let tagged = match value {
            Value::String(s) => TaggedValue::Text(s.clone()),
            Value::Number(_) => TaggedValue::Number(number(value)?),
            Value::Array(items) if items.len() == 2 => {
                TaggedValue::Pair(operand(&items[0])?, operand(&items[1])?)
            }
            Value::Object(map) if map.len() == 1 && map.contains_key(DATE_KEY) => {
                match map.get(DATE_KEY) {
                    Some(Value::String(text)) => TaggedValue::date(parse_date(text)?),
                    Some(other) => return Err(NarrowError::InvalidDate(other.to_string())),
                    None => return Err(unreachable_variant(value)),
                }
            }
            Value::Object(map) if map.len() == 1 && map.contains_key(TEXT_KEY) => {
                match map.get(TEXT_KEY) {
                    Some(Value::String(s)) => TaggedValue::date_text(s.clone()),
                    _ => return Err(unreachable_variant(value)),
                }
            }
            _ => return Err(unreachable_variant(value)),
        };

        Ok(tagged)
    }
}

impl TryFrom<&Value> for TaggedValue {
    type Error = NarrowError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_unchecked(value)
    }
}

/// Parse a date literal into a UTC instant.
///
/// Bare calendar dates are taken as midnight UTC; timestamps with an offset
/// are converted to UTC.
pub fn parse_date(text: &str) -> Result<DateTime<Utc>, NarrowError> {
    let invalid = || NarrowError::InvalidDate(text.to_string());

    if !patterns::is_date_literal(text) {
        return Err(invalid());
    }

    if patterns::is_calendar_date(text) {
        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| invalid())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(midnight.and_utc());
    }

    let normalized = text.to_ascii_uppercase();
    let parsed = DateTime::parse_from_rfc3339(&normalized).map_err(|_| invalid())?;
    Ok(parsed.with_timezone(&Utc))
}

/// Describe the JSON shape of a value for error reporting.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(map) => {
            let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
            keys.sort_unstable();
            format!("object {{{}}}", keys.join(", "))
        }
    }
}

fn date_literal(value: &Value) -> Option<&str> {
    value.get(DATE_KEY).and_then(Value::as_str)
}

fn number(value: &Value) -> Result<f64, NarrowError> {
    value.as_f64().ok_or_else(|| unreachable_variant(value))
}

/// Convert unchecked input into a single pair operand.
pub fn operand(value: &Value) -> Result<Operand, NarrowError> {
    match value {
        Value::String(s) => Ok(Operand::Text(s.clone())),
        Value::Number(_) => Ok(Operand::Number(number(value)?)),
        Value::Bool(b) => Ok(Operand::Boolean(*b)),
        _ => Err(unreachable_variant(value)),
    }
}

fn unreachable_variant(value: &Value) -> NarrowError {
    let found = describe(value);
    tracing::warn!(found = %found, "Rejected input outside the closed union");
    NarrowError::UnreachableVariant { found }
}
