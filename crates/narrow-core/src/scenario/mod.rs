//! Scenario parsing and validation.
//!
//! A scenario is a named list of cases, each holding unchecked input for the
//! boundary. Scenarios are YAML or JSON documents validated against the
//! embedded JSON Schema before they are parsed.

mod parser;
mod schema;

pub use parser::{Case, Scenario, ScenarioError};
pub use schema::{validate_scenario_schema, SchemaError, SchemaViolation};
