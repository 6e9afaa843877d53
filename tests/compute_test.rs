//! Integration tests for record classification and factorial.

use factq::compute::{evaluate, factorial};
use factq::model::{Evaluation, NEGATIVE_MARKER, ResultEntry};
use num_bigint::BigUint;

const FACTORIAL_50: &str = "30414093201713378043612608166064768844377641568960512000000000000";

fn row(raw: &str) -> String {
    ResultEntry::new(0, &evaluate(raw)).output_text
}

// ---------------------------------------------------------------------------
// Factorial
// ---------------------------------------------------------------------------

#[test]
fn factorial_known_values() {
    assert_eq!(factorial(0), BigUint::from(1u32));
    assert_eq!(factorial(1), BigUint::from(1u32));
    assert_eq!(factorial(5), BigUint::from(120u32));
    assert_eq!(factorial(20), BigUint::from(2_432_902_008_176_640_000u64));
}

#[test]
fn factorial_is_not_truncated() {
    let value = factorial(50).to_string();
    assert_eq!(value.len(), 65);
    assert_eq!(value, FACTORIAL_50);
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn integer_rows_show_value_and_factorial() {
    assert_eq!(row("5"), "5 = 120\n");
    assert_eq!(row("0"), "0 = 1\n");
    assert_eq!(row("50"), format!("50 = {FACTORIAL_50}\n"));
}

#[test]
fn non_numeric_text_passes_through() {
    for raw in ["foo", "", " 5", "5 ", "1.5", "0x10", "--3", "12abc"] {
        assert_eq!(
            evaluate(raw),
            Evaluation::PassThrough(raw.to_string()),
            "{raw:?} should pass through"
        );
        assert_eq!(row(raw), format!("{raw}\n"));
    }
}

#[test]
fn out_of_range_integers_pass_through() {
    assert_eq!(row("2147483648"), "2147483648\n");
    assert_eq!(row("-2147483649"), "-2147483649\n");
    assert_eq!(row("99999999999999999999"), "99999999999999999999\n");
}

#[test]
fn negative_integers_get_marker_row() {
    assert_eq!(evaluate("-3"), Evaluation::Negative(-3));
    assert_eq!(row("-3"), format!("-3 = {NEGATIVE_MARKER}\n"));
    assert_eq!(
        row("-2147483648"),
        format!("-2147483648 = {NEGATIVE_MARKER}\n")
    );
}

#[test]
fn evaluation_kinds() {
    assert_eq!(evaluate("3").kind(), "factorial");
    assert_eq!(evaluate("bar").kind(), "pass_through");
    assert_eq!(evaluate("-1").kind(), "negative");
}
