//! Result buffer: completed rows keyed by sequence index.
//!
//! Workers insert in whatever order they finish; the sequencer removes only
//! the entry it is waiting for. Every insert wakes the sequencer.

use crate::model::ResultEntry;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::Notify;
use tracing::error;

/// Ordered, concurrency-safe store of rows not yet emitted.
///
/// The lock is a plain `std` mutex: it is never held across an await.
#[derive(Default)]
pub struct ResultBuffer {
    entries: Mutex<BTreeMap<u64, String>>,
    ready: Notify,
}

impl ResultBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished row and wake the sequencer.
    ///
    /// Returns `false` (and keeps the first row) if the index is already
    /// present, which would mean a record was processed twice.
    pub fn insert(&self, entry: ResultEntry) -> bool {
        let inserted = {
            let mut entries = self.lock();
            match entries.entry(entry.sequence_index) {
                std::collections::btree_map::Entry::Vacant(slot) => {
                    slot.insert(entry.output_text);
                    true
                }
                std::collections::btree_map::Entry::Occupied(_) => false,
            }
        };
        if inserted {
            self.ready.notify_one();
        } else {
            error!(
                sequence_index = entry.sequence_index,
                "duplicate result for sequence index, keeping the first"
            );
        }
        inserted
    }

    /// Smallest index currently held.
    pub fn first_index(&self) -> Option<u64> {
        self.lock().keys().next().copied()
    }

    /// Remove and return the row for `index` if it is the smallest held.
    pub fn take_next(&self, index: u64) -> Option<String> {
        let mut entries = self.lock();
        match entries.first_entry() {
            Some(first) if *first.key() == index => Some(first.remove()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wait until something changes: an insert, or an explicit [`wake`](Self::wake).
    ///
    /// Backed by [`Notify::notify_one`], so a wake that lands while nobody is
    /// waiting is kept for the next call. Only one task (the sequencer) may wait.
    pub async fn changed(&self) {
        self.ready.notified().await;
    }

    /// Wake the waiting sequencer without inserting anything.
    pub fn wake(&self) {
        self.ready.notify_one();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, String>> {
        // A panic while holding this lock cannot leave the map half-updated.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Evaluation;
    use std::time::Duration;

    fn row(index: u64, text: &str) -> ResultEntry {
        ResultEntry::new(index, &Evaluation::PassThrough(text.to_string()))
    }

    #[test]
    fn take_next_only_releases_the_expected_index() {
        let buffer = ResultBuffer::new();
        buffer.insert(row(2, "c"));
        buffer.insert(row(0, "a"));

        assert_eq!(buffer.first_index(), Some(0));
        assert_eq!(buffer.take_next(1), None);
        assert_eq!(buffer.take_next(0).as_deref(), Some("a\n"));
        assert_eq!(buffer.take_next(1), None);
        assert_eq!(buffer.len(), 1);

        buffer.insert(row(1, "b"));
        assert_eq!(buffer.take_next(1).as_deref(), Some("b\n"));
        assert_eq!(buffer.take_next(2).as_deref(), Some("c\n"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn duplicate_insert_keeps_first_row() {
        let buffer = ResultBuffer::new();
        assert!(buffer.insert(row(0, "first")));
        assert!(!buffer.insert(row(0, "second")));
        assert_eq!(buffer.take_next(0).as_deref(), Some("first\n"));
    }

    #[tokio::test]
    async fn insert_before_wait_is_not_lost() {
        let buffer = ResultBuffer::new();
        buffer.insert(row(0, "a"));
        tokio::time::timeout(Duration::from_secs(1), buffer.changed())
            .await
            .expect("stored wake should complete immediately");
    }
}
