//! Sequencer: the single consumer that writes rows in input order.
//!
//! ```text
//! Awaiting(n) --buffer holds n--> Emitting(n) --written--> Awaiting(n + 1)
//! Awaiting(n) --coordinator says drained--> Drained
//! ```
//!
//! While the buffer does not hold `n` and the run is not drained, the
//! sequencer parks on the buffer's notifier rather than spinning.

use crate::error::{Error, Result};
use crate::telemetry::metrics;
use crate::telemetry::span::record_state_transition;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::Span;

use super::buffer::ResultBuffer;
use super::termination::Termination;

/// Where the sequencer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Waiting for the row with this index.
    Awaiting(u64),
    /// The row with this index is ready to write.
    Emitting(u64),
    /// Terminal. Everything has been written.
    Drained,
}

impl SequencerState {
    fn name(self) -> &'static str {
        match self {
            SequencerState::Awaiting(_) => "awaiting",
            SequencerState::Emitting(_) => "emitting",
            SequencerState::Drained => "drained",
        }
    }
}

pub struct Sequencer {
    buffer: Arc<ResultBuffer>,
    termination: Arc<Termination>,
    state: SequencerState,
    emitted: u64,
}

impl Sequencer {
    pub fn new(buffer: Arc<ResultBuffer>, termination: Arc<Termination>) -> Self {
        Self {
            buffer,
            termination,
            state: SequencerState::Awaiting(0),
            emitted: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Write rows to `sink` in index order until drained.
    ///
    /// The sink is flushed after every row. Returns the number of rows written.
    pub async fn run<W>(mut self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let span = Span::current();
        let emitted = metrics::records_emitted();

        loop {
            match self.state {
                SequencerState::Awaiting(next) => {
                    if self.buffer.first_index() == Some(next) {
                        self.transition(&span, SequencerState::Emitting(next));
                    } else if self.termination.is_drained(self.emitted) {
                        self.transition(&span, SequencerState::Drained);
                    } else {
                        self.buffer.changed().await;
                    }
                }
                SequencerState::Emitting(next) => {
                    let row = self.buffer.take_next(next).ok_or_else(|| {
                        Error::Other(format!("row {next} vanished from the result buffer"))
                    })?;
                    sink.write_all(row.as_bytes()).await?;
                    sink.flush().await?;
                    self.emitted += 1;
                    emitted.add(1, &[]);
                    self.transition(&span, SequencerState::Awaiting(next + 1));
                }
                SequencerState::Drained => return Ok(self.emitted),
            }
        }
    }

    fn transition(&mut self, span: &Span, to: SequencerState) {
        record_state_transition(span, self.state.name(), to.name());
        self.state = to;
    }
}
