use chrono::{TimeZone, Utc};
use narrow_core::{
    classify, classify_unchecked, ClassificationResult, NarrowError, OperandKind, TaggedValue,
};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn text_is_uppercased(s in ".*") {
        prop_assert_eq!(
            classify(&TaggedValue::text(s.clone())),
            ClassificationResult::UppercasedString(s.to_uppercase())
        );
    }

    #[test]
    fn number_is_doubled(n in -1.0e12f64..1.0e12f64) {
        prop_assert_eq!(
            classify(&TaggedValue::number(n)),
            ClassificationResult::DoubledNumber(2.0 * n)
        );
    }

    #[test]
    fn same_text_pair_is_equal(s in "[a-zA-Z0-9 ]{0,24}") {
        let result = classify(&TaggedValue::pair(s.as_str(), s.as_str()));
        prop_assert_eq!(result.is_equal(), Some(true));
    }

    #[test]
    fn text_and_number_never_equal(s in "[0-9]{1,6}", n in 0u32..1_000_000) {
        let result = classify(&TaggedValue::pair(s.as_str(), n as f64));
        let is_short_circuit = matches!(
            result,
            ClassificationResult::EqualityReport { common: None, equal: false, .. }
        );
        prop_assert!(is_short_circuit);
    }

    #[test]
    fn boolean_pair_equal_iff_same(a in any::<bool>(), b in any::<bool>()) {
        let result = classify(&TaggedValue::pair(a, b));
        prop_assert_eq!(result.is_equal(), Some(a == b));
    }

    #[test]
    fn classify_is_pure(s in ".*", n in any::<i32>()) {
        for value in [TaggedValue::text(s.clone()), TaggedValue::number(n as f64), TaggedValue::date_text(s.clone())] {
            prop_assert_eq!(classify(&value), classify(&value));
        }
    }

    #[test]
    fn date_iso_starts_with_calendar_day(y in 1970i32..2400, m in 1u32..=12, d in 1u32..=28) {
        let at = Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();
        match classify(&TaggedValue::date(at)) {
            ClassificationResult::IsoDateString(iso) => {
                let prefix = format!("{:04}-{:02}-{:02}", y, m, d);
                prop_assert!(iso.starts_with(&prefix));
                prop_assert!(iso.ends_with(".000Z"));
            }
            other => prop_assert!(false, "expected ISO string, got {:?}", other),
        }
    }
}

#[test]
fn new_year_2025_is_iso() {
    let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    match classify(&TaggedValue::date(at)) {
        ClassificationResult::IsoDateString(iso) => assert!(iso.starts_with("2025-01-01")),
        other => panic!("expected ISO string, got {:?}", other),
    }
}

#[test]
fn date_text_is_unchanged() {
    assert_eq!(
        classify(&TaggedValue::date_text("2025-01-01")),
        ClassificationResult::UppercasedFallback("2025-01-01".to_string())
    );
}

#[test]
fn true_false_not_equal() {
    let result = classify(&TaggedValue::pair(true, false));
    assert_eq!(
        result,
        ClassificationResult::EqualityReport {
            left: true.into(),
            right: false.into(),
            common: Some(OperandKind::Boolean),
            equal: false,
        }
    );
}

#[test]
fn unchecked_input_outside_union() {
    for input in [json!(null), json!(true), json!([1, 2, 3]), json!({"a": 1})] {
        assert!(matches!(
            classify_unchecked(&input),
            Err(NarrowError::UnreachableVariant { .. })
        ));
    }
    assert!(matches!(
        classify_unchecked(&json!({"$date": "not a date"})),
        Err(NarrowError::InvalidDate(_))
    ));
}
