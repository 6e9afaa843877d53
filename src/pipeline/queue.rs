//! Work queue and sequence assigner.
//!
//! The queue is an unbounded tokio channel whose receiving half is shared by
//! every worker behind a mutex. Whoever holds the lock takes the next item;
//! no worker is preferred. Dropping the last [`QueueSender`] closes the
//! queue, and workers see `None` once it has drained.
//!
//! The queue is unbounded on purpose: the assigner never waits on workers.

use crate::error::{Error, Result};
use crate::model::InputItem;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use super::termination::Termination;

/// Create a work queue. Returns the producing half and the shared consuming half.
pub fn work_queue() -> (QueueSender, WorkQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        QueueSender {
            sender,
            depth: Arc::clone(&depth),
        },
        WorkQueue {
            receiver: Arc::new(Mutex::new(receiver)),
            depth,
        },
    )
}

/// Producing half of the work queue. Owned by the sequence assigner.
pub struct QueueSender {
    sender: mpsc::UnboundedSender<InputItem>,
    depth: Arc<AtomicUsize>,
}

impl QueueSender {
    /// Insert one item. Fails only if every consumer is gone.
    pub fn push(&self, item: InputItem) -> Result<()> {
        self.depth.fetch_add(1, Ordering::AcqRel);
        self.sender.send(item).map_err(|_| {
            self.depth.fetch_sub(1, Ordering::AcqRel);
            Error::QueueClosed
        })
    }
}

/// Consuming half of the work queue. Cheap to clone; one clone per worker.
#[derive(Clone)]
pub struct WorkQueue {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<InputItem>>>,
    depth: Arc<AtomicUsize>,
}

impl WorkQueue {
    /// Wait for the next item. `None` once the queue is closed and empty.
    ///
    /// Cancel-safe: dropping the future never loses an item.
    pub async fn pop(&self) -> Option<InputItem> {
        let mut receiver = self.receiver.lock().await;
        let item = receiver.recv().await;
        if item.is_some() {
            self.depth.fetch_sub(1, Ordering::AcqRel);
        }
        item
    }

    /// Number of items pushed but not yet taken.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split one `\n`-terminated chunk into records.
///
/// A record ends at `\n`, `\r\n` or a lone `\r`. The chunk holds at most
/// one `\n`, at its end; a final chunk without one is still a record.
/// Invalid UTF-8 is an [`std::io::ErrorKind::InvalidData`] error.
pub fn split_records(chunk: &[u8]) -> std::io::Result<Vec<String>> {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    let text = std::str::from_utf8(body)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(text.split('\r').map(str::to_string).collect())
}

/// Reads records from a source, numbers them, and feeds the work queue.
pub struct SequenceAssigner {
    next_index: u64,
    sender: QueueSender,
    termination: Arc<Termination>,
}

impl SequenceAssigner {
    pub fn new(sender: QueueSender, termination: Arc<Termination>) -> Self {
        Self {
            next_index: 0,
            sender,
            termination,
        }
    }

    /// Number one record and queue it.
    pub fn assign(&mut self, raw_value: String) -> Result<()> {
        self.sender.push(InputItem::new(raw_value, self.next_index))?;
        self.next_index += 1;
        Ok(())
    }

    /// Consume the whole source, then signal that input is exhausted.
    ///
    /// Returns the number of records assigned. A read error is returned
    /// as-is and the exhaustion signal is never sent.
    pub async fn run<R>(mut self, mut source: R) -> Result<u64>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut chunk = Vec::new();
        loop {
            chunk.clear();
            if source.read_until(b'\n', &mut chunk).await? == 0 {
                break;
            }
            for record in split_records(&chunk)? {
                self.assign(record)?;
            }
        }
        Ok(self.finish())
    }

    /// Close the queue and report the final count to the coordinator.
    pub fn finish(self) -> u64 {
        let total = self.next_index;
        drop(self.sender);
        debug!(records = total, "input exhausted, work queue closed");
        self.termination.mark_input_exhausted(total);
        total
    }
}
