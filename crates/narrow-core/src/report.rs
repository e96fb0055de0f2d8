//! Reporter: runs a scenario and aggregates the classifications.
//!
//! Every case is classified independently and in document order. The report
//! carries a per-shape tally and a human-readable summary. The timestamp is
//! taken here, never inside the evaluator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::evaluator::{Classification, Evaluator};
use crate::scenario::{Scenario, ScenarioError};
use crate::types::{ClassificationResult, Guard, ShapeKind, TaggedValue};

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub input: TaggedValue,
    pub shape: ShapeKind,
    pub guard: Guard,
    pub result: ClassificationResult,

    /// The result as it would be printed
    pub rendered: String,
}

/// Aggregated result of running a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub outcomes: Vec<CaseOutcome>,
    pub counts: BTreeMap<ShapeKind, usize>,
    pub summary: String,
    pub evaluated_at: DateTime<Utc>,
}

impl RunReport {
    pub fn outcome(&self, id: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    pub fn count(&self, shape: ShapeKind) -> usize {
        self.counts.get(&shape).copied().unwrap_or(0)
    }
}

/// The Reporter classifies every case of a scenario.
pub struct Reporter {
    evaluator: Evaluator,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::new(),
        }
    }

    /// Run all cases of a scenario.
    ///
    /// Fails on the first case whose input is outside the closed union.
    pub fn run(&self, scenario: &Scenario) -> Result<RunReport, ScenarioError> {
        let mut outcomes = Vec::with_capacity(scenario.cases.len());

        for case in &scenario.cases {
            let input = case.tagged()?;
            let Classification {
                shape,
                guard,
                result,
            } = self.evaluator.classify(&input);

            tracing::debug!(case = %case.id, shape = %shape, guard = ?guard, "Classified case");

            outcomes.push(CaseOutcome {
                id: case.id.clone(),
                note: case.note.clone(),
                input,
                shape,
                guard,
                rendered: result.to_string(),
                result,
            });
        }

        let counts = self.tally(&outcomes);
        let summary = self.build_summary(&outcomes, &counts);

        Ok(RunReport {
            scenario: scenario.name.clone(),
            outcomes,
            counts,
            summary,
            evaluated_at: Utc::now(),
        })
    }

    fn tally(&self, outcomes: &[CaseOutcome]) -> BTreeMap<ShapeKind, usize> {
        let mut counts = BTreeMap::new();
        for outcome in outcomes {
            *counts.entry(outcome.shape).or_insert(0) += 1;
        }
        counts
    }

    /// Build a human-readable summary, listing shapes in a fixed order.
    fn build_summary(&self, outcomes: &[CaseOutcome], counts: &BTreeMap<ShapeKind, usize>) -> String {
        let mut summary = format!("{} cases classified", outcomes.len());

        let parts: Vec<String> = ShapeKind::all()
            .iter()
            .filter_map(|shape| counts.get(shape).map(|n| format!("{} {}", n, shape)))
            .collect();

        if !parts.is_empty() {
            summary.push_str(": ");
            summary.push_str(&parts.join(", "));
        }

        let equal_pairs = outcomes
            .iter()
            .filter(|o| o.result.is_equal() == Some(true))
            .count();
        if counts.contains_key(&ShapeKind::Pair) {
            summary.push_str(&format!(". {} equal pair(s)", equal_pairs));
        }

        summary.push('.');
        summary
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
