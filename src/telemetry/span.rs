//! Span helpers for pipeline runs and individual records.

use tracing::Span;
use uuid::Uuid;

/// Span covering one whole pipeline run.
pub fn start_run_span(run_id: &Uuid, workers: usize) -> Span {
    tracing::info_span!("pipeline.run", "run.id" = %run_id, "run.workers" = workers)
}

/// Span covering one record on one worker.
///
/// `item.kind` is declared empty and filled in once the record is classified.
pub fn start_item_span(worker: usize, sequence_index: u64) -> Span {
    tracing::debug_span!(
        "pipeline.item",
        "item.worker" = worker,
        "item.index" = sequence_index,
        "item.kind" = tracing::field::Empty,
    )
}

/// Record a state transition event on the given span.
pub fn record_state_transition(span: &Span, from: &str, to: &str) {
    span.in_scope(|| {
        tracing::debug!(from = from, to = to, "state_transition");
    });
}
