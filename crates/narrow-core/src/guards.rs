//! Additional narrowing walkthroughs over the closed operand types.
//!
//! These mirror the smaller narrowing exercises: combining two operands of
//! the same kind, squaring an id when it is numeric, the `in` check on a
//! text-or-boolean, and optional chaining through nested records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{render_number, Operand};

/// Result of [`combine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Combined {
    Text(String),
    Number(#[serde(with = "crate::types::script_number")] f64),
    Invalid,
}

impl fmt::Display for Combined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&render_number(*n)),
            Self::Invalid => f.write_str("Invalid types"),
        }
    }
}

/// Combine two operands with `+`, only along the narrowed combinations.
///
/// Text + text concatenates, number + number adds, text + number appends the
/// number's printed form. Everything else, including number + text, is
/// [`Combined::Invalid`].
pub fn combine(a: &Operand, b: &Operand) -> Combined {
    match (a, b) {
        (Operand::Text(x), Operand::Text(y)) => Combined::Text(format!("{}{}", x, y)),
        (Operand::Number(x), Operand::Number(y)) => Combined::Number(x + y),
        (Operand::Text(x), Operand::Number(y)) => {
            Combined::Text(format!("{}{}", x, render_number(*y)))
        }
        _ => Combined::Invalid,
    }
}

/// Uppercase a textual id or square a numeric one.
///
/// Booleans are outside the `string | number` id union and yield `None`.
pub fn square_or_upper(id: &Operand) -> Option<Combined> {
    match id {
        Operand::Text(s) => Some(Combined::Text(s.to_uppercase())),
        Operand::Number(n) => Some(Combined::Number(n * n)),
        Operand::Boolean(_) => None,
    }
}

/// Uppercase when the value supports it, print it unchanged otherwise.
///
/// Numbers are not part of the text-or-boolean union and yield `None`.
pub fn upper_if_textual(value: &Operand) -> Option<String> {
    match value {
        Operand::Text(s) => Some(s.to_uppercase()),
        Operand::Boolean(b) => Some(b.to_string()),
        Operand::Number(_) => None,
    }
}

/// Innermost record of [`Nested`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub tren: f64,
}

/// A record with optional links, walked by [`present_nested`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Nested {
    #[serde(default)]
    pub foo: Option<Leaf>,

    #[serde(default)]
    pub bar: Option<Leaf>,
}

/// Follow `param?.foo?.tren` and keep the value only when it is truthy.
pub fn present_nested(param: Option<&Nested>) -> Option<f64> {
    param
        .and_then(|nested| nested.foo.as_ref())
        .map(|leaf| leaf.tren)
        .filter(|tren| *tren != 0.0 && !tren.is_nan())
}
