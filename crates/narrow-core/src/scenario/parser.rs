//! Scenario parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_scenario_schema;
use crate::types::TaggedValue;
use crate::NarrowError;

/// Errors that can occur when loading scenarios.
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Scenario validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Case {case_id} has invalid input: {source}")]
    Input {
        case_id: String,
        #[source]
        source: NarrowError,
    },
}

/// A single case: an id and the unchecked input to classify.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    /// Unique identifier (e.g., "C1")
    pub id: String,

    /// Free-form note shown next to the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Input as written in the document, converted at the boundary
    pub input: serde_json::Value,
}

impl Case {
    pub fn new(id: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            note: None,
            input,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Convert this case's input into the closed union.
    pub fn tagged(&self) -> Result<TaggedValue, ScenarioError> {
        TaggedValue::from_unchecked(&self.input).map_err(|source| ScenarioError::Input {
            case_id: self.id.clone(),
            source,
        })
    }
}

/// A named list of cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Version of this scenario (semver)
    pub scenario_version: String,

    /// Human-readable name
    pub name: String,

    /// Detailed description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cases, classified in order
    pub cases: Vec<Case>,
}

impl Scenario {
    /// Build a scenario in code. Call [`Scenario::validate`] before running it.
    pub fn new(name: impl Into<String>, cases: Vec<Case>) -> Self {
        Self {
            scenario_version: "1.0".to_string(),
            name: name.into(),
            description: None,
            cases,
        }
    }

    /// Parse a scenario from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ScenarioError> {
        let document: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(document)
    }

    /// Parse a scenario from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(document)
    }

    /// Parse a scenario from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a scenario from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a scenario file, choosing the format by extension.
    ///
    /// `.json` is read as JSON; anything else is read as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_yaml_file(path)
        }
    }

    fn from_value(document: serde_json::Value) -> Result<Self, ScenarioError> {
        validate_scenario_schema(&document)
            .map_err(|errors| {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                ScenarioError::ValidationError(messages.join("; "))
            })?;

        let scenario: Scenario = serde_json::from_value(document)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Validate the scenario structure and every case's input.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.is_empty() {
            return Err(ScenarioError::MissingField("name".to_string()));
        }

        if self.cases.is_empty() {
            return Err(ScenarioError::MissingField("cases".to_string()));
        }

        self.validate_unique_case_ids()?;

        for case in &self.cases {
            case.tagged()?;
        }

        Ok(())
    }

    fn validate_unique_case_ids(&self) -> Result<(), ScenarioError> {
        let mut seen = HashSet::new();

        for case in &self.cases {
            if !seen.insert(&case.id) {
                return Err(ScenarioError::ValidationError(format!(
                    "Duplicate case ID: {}",
                    case.id
                )));
            }
        }

        Ok(())
    }

    /// Every case converted into the closed union, in order.
    pub fn values(&self) -> Result<Vec<(&str, TaggedValue)>, ScenarioError> {
        self.cases
            .iter()
            .map(|case| case.tagged().map(|value| (case.id.as_str(), value)))
            .collect()
    }
}
