//! Core data model.
//!
//! A record enters the pipeline as an [`InputItem`] and leaves it as a
//! [`ResultEntry`]. Both carry the zero-based sequence index assigned when
//! the record was read. The sequencer uses that index to put results back
//! in input order.

use num_bigint::BigUint;

// ---------------------------------------------------------------------------
// Input Item
// ---------------------------------------------------------------------------

/// A raw record paired with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    /// The record text, without its line terminator.
    pub raw_value: String,

    /// Zero-based position of the record in the input. Unique per run.
    pub sequence_index: u64,
}

impl InputItem {
    pub fn new(raw_value: impl Into<String>, sequence_index: u64) -> Self {
        Self {
            raw_value: raw_value.into(),
            sequence_index,
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// What a worker made of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The record parsed as a non-negative integer.
    Factorial { value: u32, factorial: BigUint },
    /// The record is not an integer (or is out of range). Echoed verbatim.
    PassThrough(String),
    /// The record parsed as an integer below zero. Factorial is undefined.
    Negative(i32),
}

impl Evaluation {
    /// Metric / log label for this outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            Evaluation::Factorial { .. } => "factorial",
            Evaluation::PassThrough(_) => "pass_through",
            Evaluation::Negative(_) => "negative",
        }
    }
}

/// Marker written after `<value> = ` for negative input.
pub const NEGATIVE_MARKER: &str = "invalid: negative value";

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Evaluation::Factorial { value, factorial } => write!(f, "{value} = {factorial}"),
            Evaluation::PassThrough(raw) => write!(f, "{raw}"),
            Evaluation::Negative(value) => write!(f, "{value} = {NEGATIVE_MARKER}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Result Entry
// ---------------------------------------------------------------------------

/// A finished output row, waiting in the result buffer for its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Index of the [`InputItem`] this row answers.
    pub sequence_index: u64,

    /// The full row, including the trailing line terminator.
    pub output_text: String,
}

impl ResultEntry {
    pub fn new(sequence_index: u64, evaluation: &Evaluation) -> Self {
        Self {
            sequence_index,
            output_text: format!("{evaluation}\n"),
        }
    }
}
