//! Core types for narrowing evaluation.
//!
//! `TaggedValue` is the closed union the evaluator narrows over. The tag is
//! assigned when a value is constructed (see [`crate::boundary`]), so nothing
//! downstream inspects runtime types.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value that is exactly one of the four narrowable shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TaggedValue {
    /// Textual input (`typeof x === "string"`)
    Text(String),

    /// Numeric input (`typeof x === "number"`)
    Number(#[serde(with = "script_number")] f64),

    /// Two operands compared under strict equality
    Pair(Operand, Operand),

    /// A date instance or its textual stand-in
    DateOrText(DateOrText),
}

impl TaggedValue {
    /// Create a textual value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Create a numeric value.
    pub fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// Create a pair of operands.
    pub fn pair(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::Pair(left.into(), right.into())
    }

    /// Create a date-or-text value holding a date instance.
    pub fn date(at: DateTime<Utc>) -> Self {
        Self::DateOrText(DateOrText::Date(at))
    }

    /// Create a date-or-text value holding text.
    pub fn date_text(s: impl Into<String>) -> Self {
        Self::DateOrText(DateOrText::Text(s.into()))
    }

    /// The shape this value was tagged with.
    pub fn shape(&self) -> ShapeKind {
        match self {
            Self::Text(_) => ShapeKind::Text,
            Self::Number(_) => ShapeKind::Number,
            Self::Pair(..) => ShapeKind::Pair,
            Self::DateOrText(_) => ShapeKind::DateOrText,
        }
    }
}

/// One side of a [`TaggedValue::Pair`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Text(String),
    Number(f64),
    Boolean(bool),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Self::Text(_) => OperandKind::Text,
            Self::Number(_) => OperandKind::Number,
            Self::Boolean(_) => OperandKind::Boolean,
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&render_number(*n)),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Either a real date instance or text standing in for one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateOrText {
    #[serde(rename = "$date")]
    Date(DateTime<Utc>),

    #[serde(rename = "$text")]
    Text(String),
}

/// The outcome of narrowing a [`TaggedValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClassificationResult {
    /// Text input, uppercased
    UppercasedString(String),

    /// Numeric input, doubled. Overflows to infinity past `f64::MAX / 2`.
    DoubledNumber(#[serde(with = "script_number")] f64),

    /// Strict-equality comparison of a pair
    EqualityReport {
        left: Operand,
        right: Operand,
        /// Kind both operands narrowed to, if any
        common: Option<OperandKind>,
        equal: bool,
    },

    /// A date instance rendered as ISO-8601 with millisecond precision
    IsoDateString(String),

    /// Date-or-text input that was text, uppercased
    UppercasedFallback(String),
}

impl ClassificationResult {
    pub fn is_equal(&self) -> Option<bool> {
        match self {
            Self::EqualityReport { equal, .. } => Some(*equal),
            _ => None,
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UppercasedString(s) | Self::UppercasedFallback(s) | Self::IsoDateString(s) => {
                f.write_str(s)
            }
            Self::DoubledNumber(n) => f.write_str(&render_number(*n)),
            Self::EqualityReport {
                left, right, equal, ..
            } => {
                if *equal {
                    write!(f, "{} and {} are the same", left, right)
                } else {
                    write!(f, "{} and {} are not the same", left, right)
                }
            }
        }
    }
}

/// The four shapes of the closed union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Text,
    Number,
    Pair,
    DateOrText,
}

impl ShapeKind {
    pub fn all() -> [ShapeKind; 4] {
        [
            ShapeKind::Text,
            ShapeKind::Number,
            ShapeKind::Pair,
            ShapeKind::DateOrText,
        ]
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Pair => "pair",
            Self::DateOrText => "date_or_text",
        };
        f.write_str(name)
    }
}

/// The primitive kinds a pair operand can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    Text,
    Number,
    Boolean,
}

/// The check that selected a narrowing branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guard {
    /// `typeof x === "string"`
    TypeofString,

    /// `typeof x === "number"`
    TypeofNumber,

    /// `a === b`
    StrictEquality,

    /// `x instanceof Date`
    InstanceofDate,

    /// The `else` branch of `instanceof Date`
    Fallback,
}

impl Guard {
    /// Source-level form of the check.
    pub fn expression(&self) -> &'static str {
        match self {
            Self::TypeofString => "typeof value === \"string\"",
            Self::TypeofNumber => "typeof value === \"number\"",
            Self::StrictEquality => "left === right",
            Self::InstanceofDate => "value instanceof Date",
            Self::Fallback => "else",
        }
    }
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expression())
    }
}

/// Render a date the way `Date.prototype.toISOString` does.
pub fn iso_string(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a number the way a script runtime prints it.
///
/// Integral values drop the fractional part, `NaN`/`Infinity` are spelled
/// out, and magnitudes at or above 1e21 or below 1e-6 switch to exponent
/// form with an explicit sign (`2e+21`, `2e-7`).
pub fn render_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }

    format!("{}", n)
}

/// Serde codec for numbers that may be non-finite.
///
/// Finite values are plain JSON numbers; `NaN` and the infinities are written
/// as their rendered strings, since JSON has no literal for them.
pub mod script_number {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::render_number;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if n.is_finite() {
            serializer.serialize_f64(*n)
        } else {
            serializer.serialize_str(&render_number(*n))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("not a number: {}", other))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_shape_follows_tag() {
        assert_eq!(TaggedValue::text("a").shape(), ShapeKind::Text);
        assert_eq!(TaggedValue::number(1.0).shape(), ShapeKind::Number);
        assert_eq!(TaggedValue::pair(true, false).shape(), ShapeKind::Pair);
        assert_eq!(TaggedValue::date_text("x").shape(), ShapeKind::DateOrText);
    }

    #[test]
    fn test_render_number() {
        assert_eq!(render_number(2.0), "2");
        assert_eq!(render_number(2.5), "2.5");
        assert_eq!(render_number(-0.0), "0");
        assert_eq!(render_number(f64::NAN), "NaN");
        assert_eq!(render_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_render_number_switches_to_exponent() {
        assert_eq!(render_number(2e21), "2e+21");
        assert_eq!(render_number(-1.5e22), "-1.5e+22");
        assert_eq!(render_number(2e-7), "2e-7");
        assert_eq!(render_number(1e20), "100000000000000000000");
        assert_eq!(render_number(0.000001), "0.000001");
        assert_eq!(
            ClassificationResult::DoubledNumber(2e21).to_string(),
            "2e+21"
        );
    }

    #[test]
    fn test_non_finite_numbers_serialize_as_strings() {
        let json = serde_json::to_value(ClassificationResult::DoubledNumber(f64::INFINITY)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "doubled_number", "value": "Infinity"})
        );

        let json = serde_json::to_value(TaggedValue::number(f64::NAN)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "number", "value": "NaN"}));

        let back: ClassificationResult =
            serde_json::from_value(serde_json::json!({"kind": "doubled_number", "value": "-Infinity"}))
                .unwrap();
        assert_eq!(back, ClassificationResult::DoubledNumber(f64::NEG_INFINITY));

        let bad = serde_json::from_value::<ClassificationResult>(
            serde_json::json!({"kind": "doubled_number", "value": "lots"}),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_iso_string_has_millis_and_z() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(iso_string(&at), "2025-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_equality_report_display() {
        let report = ClassificationResult::EqualityReport {
            left: Operand::from("1"),
            right: Operand::from("1"),
            common: Some(OperandKind::Text),
            equal: true,
        };
        assert_eq!(report.to_string(), "1 and 1 are the same");

        let report = ClassificationResult::EqualityReport {
            left: Operand::from(true),
            right: Operand::from(false),
            common: Some(OperandKind::Boolean),
            equal: false,
        };
        assert_eq!(report.to_string(), "true and false are not the same");
    }

    #[test]
    fn test_tagged_value_json_shape() {
        let value = TaggedValue::pair("a", 2.0);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "pair", "value": ["a", 2.0]}));

        let back: TaggedValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }
}
