//! Worker pool: N tasks pulling from the shared work queue.
//!
//! Each worker takes one item at a time, evaluates it on the blocking pool,
//! and deposits the row in the result buffer. Workers share nothing except
//! the queue and the buffer.

use crate::compute::evaluate;
use crate::error::{Error, Result};
use crate::model::{Evaluation, ResultEntry};
use crate::telemetry::metrics;
use crate::telemetry::span::start_item_span;
use opentelemetry::KeyValue;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, warn};

use super::buffer::ResultBuffer;
use super::queue::WorkQueue;

/// One member of the pool.
pub struct Worker {
    pub id: usize,
    queue: WorkQueue,
    buffer: Arc<ResultBuffer>,
}

impl Worker {
    pub fn new(id: usize, queue: WorkQueue, buffer: Arc<ResultBuffer>) -> Self {
        Self { id, queue, buffer }
    }

    /// Pull and evaluate until the queue closes or shutdown is signalled.
    ///
    /// Shutdown is only observed between items; an item already taken is
    /// always finished and deposited.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        debug!(worker = self.id, "worker started");
        let evaluated = metrics::records_evaluated();
        let duration = metrics::evaluation_duration_ms();

        loop {
            let item = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                item = self.queue.pop() => item,
            };
            let Some(item) = item else {
                debug!(worker = self.id, "work queue closed");
                break;
            };

            let span = start_item_span(self.id, item.sequence_index);
            let index = item.sequence_index;
            async {
                let start = Instant::now();
                let raw = item.raw_value;
                let evaluation = tokio::task::spawn_blocking(move || evaluate(&raw)).await?;
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

                let kind = evaluation.kind();
                tracing::Span::current().record("item.kind", kind);
                evaluated.add(1, &[KeyValue::new("kind", kind)]);
                duration.record(elapsed_ms, &[KeyValue::new("kind", kind)]);
                if let Evaluation::Negative(value) = &evaluation {
                    warn!(value = *value, "factorial undefined for negative input");
                }

                self.buffer.insert(ResultEntry::new(index, &evaluation));
                Ok::<(), Error>(())
            }
            .instrument(span)
            .await?;
        }

        debug!(worker = self.id, "worker stopped");
        Ok(())
    }
}

/// A fixed set of workers plus the signal that stops them.
pub struct WorkerPool {
    workers: JoinSet<Result<()>>,
    shutdown: watch::Sender<bool>,
}

impl WorkerPool {
    /// Spawn `size` workers on the current runtime.
    pub fn spawn(size: NonZeroUsize, queue: &WorkQueue, buffer: &Arc<ResultBuffer>) -> Self {
        let (shutdown, _) = watch::channel(false);
        let mut workers = JoinSet::new();
        for id in 0..size.get() {
            let worker = Worker::new(id, queue.clone(), Arc::clone(buffer));
            workers.spawn(worker.run(shutdown.subscribe()));
        }
        Self { workers, shutdown }
    }

    /// Resolves only if a worker fails. Workers that exit cleanly are reaped.
    pub async fn first_failure(&mut self) -> Error {
        loop {
            match self.workers.join_next().await {
                Some(Ok(Ok(()))) => continue,
                Some(Ok(Err(e))) => return e,
                Some(Err(e)) => return Error::Worker(e),
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Stop taking new items, then wait for every in-flight item to land.
    pub async fn shutdown(mut self) -> Result<()> {
        // Err only means every worker is already gone.
        let _ = self.shutdown.send(true);
        while let Some(joined) = self.workers.join_next().await {
            joined??;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InputItem;
    use crate::pipeline::queue::work_queue;

    #[tokio::test]
    async fn pool_evaluates_every_item_then_stops() {
        let (sender, queue) = work_queue();
        let buffer = Arc::new(ResultBuffer::new());
        let pool = WorkerPool::spawn(NonZeroUsize::new(3).unwrap(), &queue, &buffer);

        for (i, raw) in ["4", "x", "-2", "0"].iter().enumerate() {
            sender.push(InputItem::new(*raw, i as u64)).unwrap();
        }
        drop(sender);

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while buffer.len() < 4 {
                buffer.changed().await;
            }
        })
        .await
        .expect("workers should fill the buffer");
        pool.shutdown().await.unwrap();

        assert_eq!(buffer.take_next(0).as_deref(), Some("4 = 24\n"));
        assert_eq!(buffer.take_next(1).as_deref(), Some("x\n"));
        assert_eq!(
            buffer.take_next(2).as_deref(),
            Some("-2 = invalid: negative value\n")
        );
        assert_eq!(buffer.take_next(3).as_deref(), Some("0 = 1\n"));
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn shutdown_stops_idle_workers_on_open_queue() {
        let (_sender, queue) = work_queue();
        let buffer = Arc::new(ResultBuffer::new());
        let pool = WorkerPool::spawn(NonZeroUsize::new(2).unwrap(), &queue, &buffer);

        tokio::time::timeout(std::time::Duration::from_secs(5), pool.shutdown())
            .await
            .expect("shutdown should not hang on an open, empty queue")
            .unwrap();
    }
}
