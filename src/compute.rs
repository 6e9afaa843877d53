//! Record classification and the arbitrary-precision factorial.
//!
//! Everything here is synchronous and CPU-bound. Workers call [`evaluate`]
//! from a blocking task so a large factorial never stalls the runtime.

use crate::model::Evaluation;
use num_bigint::BigUint;

/// Classify one raw record and compute its result.
///
/// A record is an integer when it parses as a 32-bit signed value: an
/// optional sign followed by ASCII digits, nothing else. Anything else,
/// including values outside `i32` range, passes through unchanged. This
/// never fails; negative input becomes [`Evaluation::Negative`].
pub fn evaluate(raw: &str) -> Evaluation {
    match raw.parse::<i32>() {
        Ok(value) => match u32::try_from(value) {
            Ok(value) => Evaluation::Factorial {
                value,
                factorial: factorial(value),
            },
            Err(_) => Evaluation::Negative(value),
        },
        Err(_) => Evaluation::PassThrough(raw.to_string()),
    }
}

/// `n!` with `0! = 1! = 1`.
pub fn factorial(n: u32) -> BigUint {
    (2..=n).fold(BigUint::from(1u32), |acc, i| acc * i)
}
