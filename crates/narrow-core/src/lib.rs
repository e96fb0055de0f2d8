//! # narrow-core
//!
//! Deterministic type-narrowing evaluator over a closed tagged union.
//!
//! A [`TaggedValue`] is exactly one of four shapes: text, number, a pair of
//! operands, or a date-or-text. [`classify`] narrows it to the one branch that
//! applies and returns a [`ClassificationResult`].
//!
//! ## Key Guarantees
//!
//! 1. **Pure**: Same input always produces same output
//! 2. **Closed**: The evaluator matches on the enum tag and never inspects
//!    runtime types; unchecked input is converted in [`boundary`]
//! 3. **Total**: Every `TaggedValue` classifies. Only unchecked input can hit
//!    [`NarrowError::UnreachableVariant`]
//!
//! ## Example
//!
//! ```rust
//! use narrow_core::{classify, ClassificationResult, TaggedValue};
//!
//! let result = classify(&TaggedValue::text("hello"));
//! assert_eq!(result, ClassificationResult::UppercasedString("HELLO".to_string()));
//!
//! let result = classify(&TaggedValue::pair(true, false));
//! assert_eq!(result.is_equal(), Some(false));
//! ```

pub mod boundary;
pub mod catalog;
pub mod evaluator;
pub mod guards;
pub mod patterns;
pub mod report;
pub mod scenario;
pub mod types;

// Re-export main types at crate root
pub use evaluator::{Classification, Evaluator};
pub use report::{CaseOutcome, Reporter, RunReport};
pub use scenario::{Case, Scenario, ScenarioError};
pub use types::{
    ClassificationResult, DateOrText, Guard, Operand, OperandKind, ShapeKind, TaggedValue,
};

use thiserror::Error;

/// Errors raised when input does not fit the closed union.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NarrowError {
    #[error("Unreachable variant: input of shape {found} is outside the closed union")]
    UnreachableVariant { found: String },

    #[error("Invalid date literal: {0}")]
    InvalidDate(String),
}

/// Classify a tagged value.
///
/// This is the main entry point for narrowing.
///
/// * Text → uppercased
/// * Number → doubled
/// * Pair → equality report, equal only when both operands share a kind and value
/// * Date → ISO-8601 string; text in date position → uppercased
pub fn classify(value: &TaggedValue) -> ClassificationResult {
    classify_traced(value).result
}

/// Classify a tagged value and keep the shape and guard that selected the branch.
pub fn classify_traced(value: &TaggedValue) -> Classification {
    Evaluator::new().classify(value)
}

/// Classify unchecked input.
///
/// The input is converted at the boundary first. Anything outside the closed
/// union fails with [`NarrowError::UnreachableVariant`]; a malformed date
/// literal fails with [`NarrowError::InvalidDate`].
pub fn classify_unchecked(input: &serde_json::Value) -> Result<ClassificationResult, NarrowError> {
    let value = TaggedValue::from_unchecked(input)?;
    Ok(classify(&value))
}

/// Run every case of a scenario.
pub fn run(scenario: &Scenario) -> Result<RunReport, ScenarioError> {
    Reporter::new().run(scenario)
}
