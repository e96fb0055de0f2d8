//! Built-in demonstration scenario.
//!
//! The narrowing calls from the walkthrough script, one case per call, in the
//! order they are made there.

use serde_json::json;

use crate::scenario::{Case, Scenario};

/// Scenario name used by [`demonstrations`].
pub const DEMO_NAME: &str = "Type narrowing walkthrough";

/// The walkthrough's narrowing calls as a ready-made scenario.
pub fn demonstrations() -> Scenario {
    let mut scenario = Scenario::new(
        DEMO_NAME,
        vec![
            Case::new("D1", json!("1")).with_note("typeof id === \"string\""),
            Case::new("D2", json!(1)).with_note("typeof id === \"number\""),
            Case::new("D3", json!(["1", "1"])).with_note("string | boolean vs string | number"),
            Case::new("D4", json!([true, false])).with_note("booleans share a kind but differ"),
            Case::new("D5", json!(["1", 1])).with_note("no common kind"),
            Case::new("D6", json!({"$date": "2025-01-01"})).with_note("date instanceof Date"),
            Case::new("D7", json!({"$text": "2025-01-01"})).with_note("text in date position"),
            Case::new("D8", json!("1")).with_note("never branch left unreachable"),
        ],
    );
    scenario.description =
        Some("Each narrowing example, classified through the closed union.".to_string());
    scenario
}
