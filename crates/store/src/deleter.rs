//! Scan-then-delete sweeps.
//!
//! Deletion is two separate steps so the operator confirmation sits
//! between them: collect candidate keys first, then delete exactly the
//! keys the operator approved. No cascade — deleting a parent leaves its
//! dependents in place.

use std::time::Duration;

use tracing::{info, warn};

use crate::backend::{ScanFilter, StoreBackend, MAX_BATCH_ITEMS};
use crate::errors::StoreError;
use crate::model::RecordKey;

/// Candidate keys found by a scan, with how many items were examined.
#[derive(Debug, Clone)]
pub struct KeySweep {
    pub keys: Vec<RecordKey>,
    pub scanned: usize,
}

/// Outcome of one delete run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

pub struct BulkDeleter<'a, S: StoreBackend + ?Sized> {
    store: &'a S,
    pause: Duration,
}

impl<'a, S: StoreBackend + ?Sized> BulkDeleter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            pause: Duration::from_secs(1),
        }
    }

    pub fn with_pause_secs(mut self, secs: u64) -> Self {
        self.pause = Duration::from_secs(secs);
        self
    }

    /// Scans for keys matching the filter, stopping early once `limit`
    /// candidates are collected and truncating to exactly that many.
    pub async fn collect_keys(
        &self,
        filter: &ScanFilter,
        limit: Option<usize>,
    ) -> Result<KeySweep, StoreError> {
        let mut keys: Vec<RecordKey> = Vec::new();
        let mut scanned = 0;
        let mut token = None;

        loop {
            let page = self.store.scan_keys_page(filter, token).await?;
            scanned += page.scanned;
            keys.extend(page.keys);

            if let Some(limit) = limit {
                if keys.len() >= limit {
                    info!("found {} candidates, meeting the limit of {limit}", keys.len());
                    keys.truncate(limit);
                    break;
                }
            }

            token = page.next;
            if token.is_none() {
                break;
            }
        }

        Ok(KeySweep { keys, scanned })
    }

    /// Deletes the given keys in chunks, best effort. Unprocessed keys are
    /// counted as failed and left for a rerun.
    pub async fn delete_keys(&self, keys: &[RecordKey]) -> DeleteReport {
        let mut report = DeleteReport::default();

        let chunk_count = keys.chunks(MAX_BATCH_ITEMS).count();
        for (index, chunk) in keys.chunks(MAX_BATCH_ITEMS).enumerate() {
            match self.store.batch_delete(chunk).await {
                Ok(unprocessed) => {
                    report.deleted += chunk.len() - unprocessed;
                    report.failed += unprocessed;
                    if unprocessed > 0 {
                        warn!(
                            "{unprocessed} keys in chunk {} were left unprocessed; rerun to retry them",
                            index + 1
                        );
                    }
                    info!(
                        "deleted chunk of {} ({}/{} keys so far)",
                        chunk.len(),
                        report.deleted,
                        keys.len()
                    );
                }
                Err(e) => {
                    report.failed += chunk.len();
                    warn!("delete chunk {} failed: {e}", index + 1);
                }
            }

            if index + 1 < chunk_count && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        report
    }

    /// Convenience sweep: collect and delete in one call. The interactive
    /// binaries do not use this; they confirm with the operator between
    /// the two steps.
    pub async fn delete_matching(
        &self,
        filter: &ScanFilter,
        limit: Option<usize>,
    ) -> Result<DeleteReport, StoreError> {
        let sweep = self.collect_keys(filter, limit).await?;
        let mut report = self.delete_keys(&sweep.keys).await;
        report.scanned = sweep.scanned;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::model::{Partition, Record};

    async fn seed(store: &MemoryStore, partition: Partition, count: usize) {
        let records: Vec<Record> = (0..count).map(|_| Record::new(partition)).collect();
        for chunk in records.chunks(MAX_BATCH_ITEMS) {
            store.batch_put(chunk).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_capped_delete_removes_exactly_the_cap() {
        let store = MemoryStore::new().with_page_size(10);
        seed(&store, Partition::ExamSession, 40).await;

        let deleter = BulkDeleter::new(&store).with_pause_secs(0);
        let report = deleter
            .delete_matching(&ScanFilter::Partition(Partition::ExamSession), Some(15))
            .await
            .unwrap();

        assert_eq!(report.deleted, 15);
        assert_eq!(store.partition_len(Partition::ExamSession), 25);
    }

    #[tokio::test]
    async fn test_partition_filter_leaves_other_partitions_untouched() {
        let store = MemoryStore::new();
        seed(&store, Partition::ExamSession, 5).await;
        seed(&store, Partition::Exam, 4).await;

        let deleter = BulkDeleter::new(&store).with_pause_secs(0);
        let report = deleter
            .delete_matching(&ScanFilter::Partition(Partition::ExamSession), None)
            .await
            .unwrap();

        assert_eq!(report.deleted, 5);
        assert_eq!(store.partition_len(Partition::ExamSession), 0);
        assert_eq!(store.partition_len(Partition::Exam), 4);
    }

    #[tokio::test]
    async fn test_unprocessed_deletes_count_as_failed() {
        let store = MemoryStore::new();
        seed(&store, Partition::Payment, 10).await;

        let deleter = BulkDeleter::new(&store).with_pause_secs(0);
        let sweep = deleter
            .collect_keys(&ScanFilter::Partition(Partition::Payment), None)
            .await
            .unwrap();
        store.reject_next(2);
        let report = deleter.delete_keys(&sweep.keys).await;

        assert_eq!(report.deleted, 8);
        assert_eq!(report.failed, 2);
        assert_eq!(store.partition_len(Partition::Payment), 2);
    }

    #[tokio::test]
    async fn test_empty_sweep_reports_nothing_to_do() {
        let store = MemoryStore::new();
        let deleter = BulkDeleter::new(&store);
        let sweep = deleter.collect_keys(&ScanFilter::All, None).await.unwrap();
        assert!(sweep.keys.is_empty());
        assert_eq!(sweep.scanned, 0);
    }
}
