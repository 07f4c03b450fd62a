//! Chunked batch writes.

use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{StoreBackend, MAX_BATCH_ITEMS};
use crate::model::Record;

/// Outcome of one bulk write run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Submits records in chunks of [`MAX_BATCH_ITEMS`], pausing between
/// chunks to stay under the table's write-throughput allocation.
///
/// Items the store reports as unprocessed are counted as failed and left
/// for the operator to retry with a rerun; nothing is retried here.
pub struct BatchWriter<'a, S: StoreBackend + ?Sized> {
    store: &'a S,
    pause: Duration,
}

impl<'a, S: StoreBackend + ?Sized> BatchWriter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            pause: Duration::from_secs(3),
        }
    }

    pub fn with_pause_secs(mut self, secs: u64) -> Self {
        self.pause = Duration::from_secs(secs);
        self
    }

    pub async fn put_all(&self, records: &[Record]) -> WriteReport {
        let mut report = WriteReport {
            attempted: records.len(),
            ..WriteReport::default()
        };

        let chunk_count = records.chunks(MAX_BATCH_ITEMS).count();
        for (index, chunk) in records.chunks(MAX_BATCH_ITEMS).enumerate() {
            match self.store.batch_put(chunk).await {
                Ok(unprocessed) => {
                    report.succeeded += chunk.len() - unprocessed;
                    report.failed += unprocessed;
                    if unprocessed > 0 {
                        warn!(
                            "{unprocessed} items in chunk {} were left unprocessed; rerun to retry them",
                            index + 1
                        );
                    }
                    info!(
                        "wrote chunk of {} ({}/{} records so far)",
                        chunk.len(),
                        report.succeeded,
                        report.attempted
                    );
                }
                Err(e) => {
                    report.failed += chunk.len();
                    warn!("chunk {} failed: {e}", index + 1);
                }
            }

            if index + 1 < chunk_count && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::model::Partition;

    fn records(count: usize) -> Vec<Record> {
        (0..count).map(|_| Record::new(Partition::Student)).collect()
    }

    #[tokio::test]
    async fn test_chunked_write_counts() {
        let store = MemoryStore::new();
        let batch = records(60);

        let report = BatchWriter::new(&store)
            .with_pause_secs(0)
            .put_all(&batch)
            .await;

        assert_eq!(report.attempted, 60);
        assert_eq!(report.succeeded, 60);
        assert_eq!(report.failed, 0);
        assert_eq!(store.len(), 60);
    }

    #[tokio::test]
    async fn test_unprocessed_items_count_as_failed() {
        let store = MemoryStore::new();
        let batch = records(10);
        store.reject_next(4);

        let report = BatchWriter::new(&store)
            .with_pause_secs(0)
            .put_all(&batch)
            .await;

        assert_eq!(report.succeeded, 6);
        assert_eq!(report.failed, 4);
        assert_eq!(store.len(), 6);
    }

    #[tokio::test]
    async fn test_rewriting_same_keys_overwrites_in_place() {
        let store = MemoryStore::new();
        let batch = records(30);

        BatchWriter::new(&store).with_pause_secs(0).put_all(&batch).await;
        let report = BatchWriter::new(&store).with_pause_secs(0).put_all(&batch).await;

        assert_eq!(report.succeeded, 30);
        assert_eq!(store.len(), 30);
    }

    #[tokio::test]
    async fn test_empty_input_writes_nothing() {
        let store = MemoryStore::new();
        let report = BatchWriter::new(&store).put_all(&[]).await;
        assert_eq!(report, WriteReport::default());
    }
}
