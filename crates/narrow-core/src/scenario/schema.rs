//! JSON Schema validation for scenarios.
//!
//! Scenarios are validated against schema/scenario.schema.json, embedded at
//! compile time and compiled once on first use.

use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Embedded scenario schema (loaded at compile time).
const SCENARIO_SCHEMA_JSON: &str = include_str!("../../../../schema/scenario.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: Value = match serde_json::from_str(SCENARIO_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// One schema violation, located within the scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    /// JSON pointer to the offending value
    pub pointer: String,

    /// Index into `cases` when the violation sits inside a case
    pub case_index: Option<usize>,

    /// That case's id, when it has a string one
    pub case_id: Option<String>,

    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.case_index, &self.case_id) {
            (Some(index), Some(id)) => write!(f, "case #{} ({}): ", index, id)?,
            (Some(index), None) => write!(f, "case #{}: ", index)?,
            _ => {}
        }
        write!(f, "{} at {}", self.message, self.pointer)
    }
}

impl SchemaViolation {
    fn locate(document: &Value, pointer: String, message: String) -> Self {
        let case_index = pointer
            .strip_prefix("/cases/")
            .and_then(|rest| rest.split('/').next())
            .and_then(|index| index.parse::<usize>().ok());
        let case_id = case_index
            .and_then(|index| document.get("cases")?.get(index)?.get("id")?.as_str())
            .map(str::to_string);

        Self {
            pointer,
            case_index,
            case_id,
            message,
        }
    }
}

/// Validate a scenario document against the schema.
///
/// Returns every violation, located by JSON pointer and, inside `cases`, by
/// case index and id.
pub fn validate_scenario_schema(document: &Value) -> Result<(), Vec<SchemaViolation>> {
    let validator = get_validator().map_err(|e| {
        vec![SchemaViolation {
            pointer: String::new(),
            case_index: None,
            case_id: None,
            message: e.to_string(),
        }]
    })?;

    let violations: Vec<SchemaViolation> = validator
        .iter_errors(document)
        .map(|e| SchemaViolation::locate(document, e.instance_path.to_string(), e.to_string()))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_scenario_passes_schema() {
        let value = json!({
            "scenario_version": "1.0",
            "name": "Walkthrough",
            "cases": [
                { "id": "C1", "input": "hello" },
                { "id": "C2", "input": { "$date": "2025-01-01" }, "note": "a date" }
            ]
        });
        assert!(validate_scenario_schema(&value).is_ok());
    }

    #[test]
    fn test_missing_cases_fails() {
        let value = json!({
            "scenario_version": "1.0",
            "name": "Walkthrough"
        });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_empty_cases_fails() {
        let value = json!({
            "scenario_version": "1.0",
            "name": "Walkthrough",
            "cases": []
        });
        assert!(validate_scenario_schema(&value).is_err());
    }

    #[test]
    fn test_invalid_version_format_fails() {
        let value = json!({
            "scenario_version": "one",
            "name": "Walkthrough",
            "cases": [{ "id": "C1", "input": 1 }]
        });
        assert!(validate_scenario_schema(&value).is_err());
    }

    #[test]
    fn test_invalid_case_id_fails() {
        let value = json!({
            "scenario_version": "1.0",
            "name": "Walkthrough",
            "cases": [
                { "id": "C1", "input": 1 },
                { "id": "case_2", "input": 2 }
            ]
        });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].pointer, "/cases/1/id");
        assert_eq!(errors[0].case_index, Some(1));
        assert_eq!(errors[0].case_id.as_deref(), Some("case_2"));
        assert!(errors[0].to_string().starts_with("case #1 (case_2): "));
    }

    #[test]
    fn test_top_level_violation_has_no_case() {
        let value = json!({
            "scenario_version": "one",
            "name": "Walkthrough",
            "cases": [{ "id": "C1", "input": 1 }]
        });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert_eq!(errors[0].pointer, "/scenario_version");
        assert_eq!(errors[0].case_index, None);
    }

    #[test]
    fn test_case_without_id_is_located_by_index() {
        let value = json!({
            "scenario_version": "1.0",
            "name": "Walkthrough",
            "cases": [{ "id": "C1", "input": 1 }, { "input": 2 }]
        });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert_eq!(errors[0].case_index, Some(1));
        assert_eq!(errors[0].case_id, None);
        assert!(errors[0].to_string().starts_with("case #1: "));
    }

    #[test]
    fn test_additional_properties_fail() {
        let value = json!({
            "scenario_version": "1.0",
            "name": "Walkthrough",
            "cases": [{ "id": "C1", "input": 1 }],
            "unknown_field": true
        });
        let errors = validate_scenario_schema(&value).unwrap_err();
        assert_eq!(errors[0].case_index, None);
    }
}
