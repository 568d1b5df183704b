//! Property-Based Tests
//!
//! Invariants of the measurement engine checked over generated input:
//! - every emitted value traces back to a literal in the text
//! - loose numbers never repeat a tagged literal
//! - classification and totals neither drop nor invent quantities

use std::collections::HashSet;

use pdfmeasure::measure::{
    extract_candidates, measure_page, tokenize, Classifier, LooseClass, MeasureOptions,
    MeasurementKind,
};
use proptest::prelude::*;

const UNITS: [&str; 4] = [" sq m", "mm", " m", ""];

/// Text made of distinct integers, each with an optional unit marker.
fn tagged_text() -> impl Strategy<Value = (String, Vec<(u32, usize)>)> {
    prop::collection::hash_set(1u32..100_000, 0..20)
        .prop_flat_map(|numbers| {
            let numbers: Vec<u32> = numbers.into_iter().collect();
            let len = numbers.len();
            (Just(numbers), prop::collection::vec(0usize..UNITS.len(), len))
        })
        .prop_map(|(numbers, units)| {
            let items: Vec<(u32, usize)> = numbers.into_iter().zip(units).collect();
            let text = items
                .iter()
                .map(|(n, u)| format!("{}{}", n, UNITS[*u]))
                .collect::<Vec<_>>()
                .join(" ; ");
            (text, items)
        })
}

// ============================================================================
// Round-trip
// ============================================================================

/// Property: every token value reparses from the literal found at its offset
#[test]
fn proptest_values_round_trip() {
    proptest!(|(text in "[0-9a-zA-Z .,]{0,120}")| {
        let tokens = tokenize(&text);
        let all = tokens
            .sq_m
            .iter()
            .chain(&tokens.mm)
            .chain(&tokens.m)
            .chain(&tokens.loose);

        for token in all {
            prop_assert!(text[token.offset..].starts_with(token.literal));
            prop_assert_eq!(&token.normalized, &token.literal.replace(',', ""));
            if let Some(value) = token.value {
                prop_assert!(value.is_finite());
                prop_assert_eq!(Ok(value), token.normalized.parse::<f64>());
            }
        }
    });
}

/// Property: the engine never panics on arbitrary text
#[test]
fn proptest_measure_no_panic() {
    proptest!(|(text in "\\PC{0,300}")| {
        let page = measure_page(1, &text, &MeasureOptions::default());
        prop_assert!(page.records.iter().all(|r| r.value().is_finite()));
    });
}

// ============================================================================
// Disjointness
// ============================================================================

/// Property: no loose literal shares its normalized text with a tagged one
#[test]
fn proptest_loose_disjoint_from_tagged() {
    proptest!(|(text in "[0-9 .,a-z]{0,120}")| {
        let tokens = tokenize(&text);
        let tagged: HashSet<&str> = tokens
            .sq_m
            .iter()
            .chain(&tokens.mm)
            .chain(&tokens.m)
            .map(|t| t.normalized.as_str())
            .collect();

        for token in &tokens.loose {
            prop_assert!(!tagged.contains(token.normalized.as_str()));
        }
    });
}

// ============================================================================
// Conservation
// ============================================================================

/// Property: each category total is the sum of the numbers written with it
#[test]
fn proptest_totals_conserve_generated_numbers() {
    proptest!(|((text, items) in tagged_text())| {
        let page = measure_page(1, &text, &MeasureOptions::default());

        let sum_of = |unit: usize| -> f64 {
            items
                .iter()
                .filter(|(_, u)| *u == unit)
                .map(|(n, _)| *n as f64)
                .fold(0.0, |acc, v| acc + v)
        };

        prop_assert_eq!(page.totals.total_sq_m, sum_of(0));
        prop_assert_eq!(page.totals.total_mm, sum_of(1));
        prop_assert_eq!(page.totals.total_m, sum_of(2));
        prop_assert_eq!(page.totals.total_unknown, sum_of(3));
        prop_assert_eq!(page.records.len(), items.len());
    });
}

/// Property: records account for every candidate value exactly once
#[test]
fn proptest_records_cover_candidates() {
    proptest!(|(text in "[0-9a-z .,]{0,120}", threshold in 0.0f64..1e6)| {
        let options = MeasureOptions::new().with_threshold(threshold);
        let candidates = extract_candidates(&text);
        let page = measure_page(1, &text, &options);

        prop_assert_eq!(page.records.len(), candidates.len());

        let loose_records = page
            .records_of(MeasurementKind::AssumedMm)
            .chain(page.records_of(MeasurementKind::Unknown))
            .count();
        prop_assert_eq!(loose_records, candidates.loose.len());
    });
}

// ============================================================================
// Classification
// ============================================================================

/// Property: a loose value is assumed millimetres exactly when it exceeds
/// the threshold
#[test]
fn proptest_threshold_is_strict() {
    proptest!(|(value in 0.0f64..1e13, threshold in 0.0f64..1e13)| {
        let expected = if value > threshold {
            LooseClass::AssumedMm
        } else {
            LooseClass::Unknown
        };
        prop_assert_eq!(Classifier::new(threshold).classify(value), expected);
        prop_assert_eq!(Classifier::new(value).classify(value), LooseClass::Unknown);
    });
}
