//! Dispatch-and-reorder pipeline.
//!
//! ```text
//! source -> SequenceAssigner -> WorkQueue -> WorkerPool -> ResultBuffer -> Sequencer -> sink
//! ```
//!
//! [`Termination`] watches the assigner, queue and buffer and tells the
//! sequencer when it may stop. After that the pool is shut down and joined,
//! so no row is still being computed when [`Pipeline::run`] returns.

pub mod buffer;
pub mod queue;
pub mod sequencer;
pub mod termination;
pub mod worker;

pub use buffer::ResultBuffer;
pub use queue::{QueueSender, SequenceAssigner, WorkQueue, work_queue};
pub use sequencer::{Sequencer, SequencerState};
pub use termination::Termination;
pub use worker::{Worker, WorkerPool};

use crate::error::{Error, Result};
use crate::telemetry::span::start_run_span;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, BufWriter};
use tracing::{Instrument, info};
use uuid::Uuid;

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of workers in the pool.
    pub worker_count: usize,
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Records read from the source.
    pub records: u64,
    /// Rows written to the sink. Equal to `records` on success.
    pub emitted: u64,
}

pub struct Pipeline {
    worker_count: NonZeroUsize,
}

impl Pipeline {
    /// Fails if the worker count is zero.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let worker_count = NonZeroUsize::new(config.worker_count)
            .ok_or_else(|| Error::Config("worker count must be greater than zero".to_string()))?;
        Ok(Self { worker_count })
    }

    /// Run every record in `source` through the pool and write the rows to `sink`.
    ///
    /// A read error, a write error or a failed worker aborts the run; the
    /// remaining workers are cancelled and the error is returned.
    pub async fn run<R, W>(&self, source: R, sink: &mut W) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let run_id = Uuid::new_v4();
        let span = start_run_span(&run_id, self.worker_count.get());
        let (records, emitted) = self.drive(source, sink).instrument(span).await?;
        Ok(RunSummary {
            run_id,
            records,
            emitted,
        })
    }

    /// Read records from the file at `input` and write rows to `output`.
    ///
    /// The output file is created or truncated.
    pub async fn run_files(&self, input: &Path, output: &Path) -> Result<RunSummary> {
        let source = BufReader::new(tokio::fs::File::open(input).await?);
        let mut sink = BufWriter::new(tokio::fs::File::create(output).await?);
        self.run(source, &mut sink).await
    }

    async fn drive<R, W>(&self, source: R, sink: &mut W) -> Result<(u64, u64)>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(workers = self.worker_count.get(), "pipeline started");

        let (sender, queue) = work_queue();
        let buffer = Arc::new(ResultBuffer::new());
        let termination = Arc::new(Termination::new(queue.clone(), Arc::clone(&buffer)));

        let mut pool = WorkerPool::spawn(self.worker_count, &queue, &buffer);
        let assigner = SequenceAssigner::new(sender, Arc::clone(&termination));
        let sequencer = Sequencer::new(Arc::clone(&buffer), Arc::clone(&termination));

        let (records, emitted) = tokio::select! {
            done = async { tokio::try_join!(assigner.run(source), sequencer.run(sink)) } => done?,
            err = pool.first_failure() => return Err(err),
        };

        pool.shutdown().await?;

        info!(records, emitted, "pipeline finished");
        Ok((records, emitted))
    }
}
