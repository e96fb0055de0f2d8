//! Evaluator: narrows a tagged value to its shape-specific result.
//!
//! Each shape has exactly one branch:
//! 1. Text → uppercased
//! 2. Number → doubled
//! 3. Pair → strict equality, computed only over a common operand kind
//! 4. DateOrText → ISO-8601 for a date instance, uppercased text otherwise
//!
//! Evaluation is pure. No clock reads, no I/O.

use serde::{Deserialize, Serialize};

use crate::types::{
    iso_string, ClassificationResult, DateOrText, Guard, Operand, OperandKind, ShapeKind,
    TaggedValue,
};

/// A classification together with the guard that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Shape of the input
    pub shape: ShapeKind,

    /// Check that selected the branch
    pub guard: Guard,

    /// The narrowed result
    pub result: ClassificationResult,
}

/// The Evaluator maps each variant of the closed union to its result.
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Classify a value, recording which guard selected the branch.
    pub fn classify(&self, value: &TaggedValue) -> Classification {
        let (guard, result) = match value {
            TaggedValue::Text(s) => (Guard::TypeofString, self.narrow_text(s)),
            TaggedValue::Number(n) => (Guard::TypeofNumber, self.narrow_number(*n)),
            TaggedValue::Pair(left, right) => {
                (Guard::StrictEquality, self.narrow_pair(left, right))
            }
            TaggedValue::DateOrText(DateOrText::Date(at)) => {
                (Guard::InstanceofDate, ClassificationResult::IsoDateString(iso_string(at)))
            }
            TaggedValue::DateOrText(DateOrText::Text(s)) => (
                Guard::Fallback,
                ClassificationResult::UppercasedFallback(s.to_uppercase()),
            ),
        };

        Classification {
            shape: value.shape(),
            guard,
            result,
        }
    }

    fn narrow_text(&self, s: &str) -> ClassificationResult {
        ClassificationResult::UppercasedString(s.to_uppercase())
    }

    fn narrow_number(&self, n: f64) -> ClassificationResult {
        ClassificationResult::DoubledNumber(n * 2.0)
    }

    /// Compare two operands under strict equality.
    ///
    /// Operands of different kinds never compare equal, so the value
    /// comparison only runs once both sides narrowed to the same kind.
    fn narrow_pair(&self, left: &Operand, right: &Operand) -> ClassificationResult {
        let common = common_kind(left, right);

        let equal = match (common, left, right) {
            (None, _, _) => false,
            (Some(_), Operand::Text(a), Operand::Text(b)) => a == b,
            (Some(_), Operand::Number(a), Operand::Number(b)) => a == b,
            (Some(_), Operand::Boolean(a), Operand::Boolean(b)) => a == b,
            (Some(_), _, _) => false,
        };

        ClassificationResult::EqualityReport {
            left: left.clone(),
            right: right.clone(),
            common,
            equal,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind both operands share, if any.
pub fn common_kind(left: &Operand, right: &Operand) -> Option<OperandKind> {
    let kind = left.kind();
    (kind == right.kind()).then_some(kind)
}
