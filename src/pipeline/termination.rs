//! Termination coordinator.
//!
//! Decides when the sequencer may stop. Three facts must hold together:
//! the assigner has said no more input is coming, the work queue is empty,
//! and the result buffer is empty. The coordinator also requires that every
//! assigned index has been emitted. That closes the window in which an item
//! has left the queue but its row has not reached the buffer yet.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::buffer::ResultBuffer;
use super::queue::WorkQueue;

pub struct Termination {
    input_exhausted: AtomicBool,
    total: AtomicU64,
    queue: WorkQueue,
    buffer: Arc<ResultBuffer>,
}

impl Termination {
    pub fn new(queue: WorkQueue, buffer: Arc<ResultBuffer>) -> Self {
        Self {
            input_exhausted: AtomicBool::new(false),
            total: AtomicU64::new(0),
            queue,
            buffer,
        }
    }

    /// Record that the assigner produced `total` items and will produce no more.
    pub fn mark_input_exhausted(&self, total: u64) {
        self.total.store(total, Ordering::Release);
        self.input_exhausted.store(true, Ordering::Release);
        // The sequencer may be parked on an empty buffer.
        self.buffer.wake();
    }

    pub fn input_exhausted(&self) -> bool {
        self.input_exhausted.load(Ordering::Acquire)
    }

    /// True once nothing is left to emit after `emitted` rows.
    pub fn is_drained(&self, emitted: u64) -> bool {
        self.input_exhausted()
            && emitted == self.total.load(Ordering::Acquire)
            && self.queue.is_empty()
            && self.buffer.is_empty()
    }
}
