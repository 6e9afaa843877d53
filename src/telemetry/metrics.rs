//! Metric instrument factories.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an exporter the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("factq")
}

/// Counter: records evaluated by workers.
/// Labels: `kind` ("factorial" | "pass_through" | "negative").
pub fn records_evaluated() -> Counter<u64> {
    meter()
        .u64_counter("factq.records.evaluated")
        .with_description("Number of records evaluated by workers")
        .build()
}

/// Histogram: time spent evaluating one record, in milliseconds.
/// Labels: `kind`.
pub fn evaluation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("factq.evaluation.duration_ms")
        .with_description("Record evaluation duration in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: rows written by the sequencer.
pub fn records_emitted() -> Counter<u64> {
    meter()
        .u64_counter("factq.records.emitted")
        .with_description("Number of rows written in order")
        .build()
}
