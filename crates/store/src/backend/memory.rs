//! In-memory backend for tests and dry runs.
//!
//! Mirrors the table's observable behaviour: point overwrites by composite
//! key, paged queries and scans, and per-batch "unprocessed item" reporting
//! that tests can trigger on demand with [`MemoryStore::reject_next`].

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::backend::{KeyPage, QueryPage, ScanFilter, StoreBackend, MAX_BATCH_ITEMS};
use crate::errors::StoreError;
use crate::model::{Partition, Record, RecordKey};

type MemKey = (String, String);

fn mem_key(key: &RecordKey) -> MemKey {
    (key.partition.as_str().to_string(), key.id.to_string())
}

/// Hash-map store with deterministic iteration order.
pub struct MemoryStore {
    items: Mutex<BTreeMap<MemKey, Record>>,
    page_size: usize,
    reject_next: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            page_size: 100,
            reject_next: Mutex::new(0),
        }
    }

    /// Shrinks pages so tests can exercise the pagination loops.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Makes the next bulk call leave up to `count` trailing items
    /// unprocessed, the way a throttled table would.
    pub fn reject_next(&self, count: usize) {
        *self.reject_next.lock().unwrap_or_else(PoisonError::into_inner) = count;
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn partition_len(&self, partition: Partition) -> usize {
        let label = partition.as_str();
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|(p, _)| p == label)
            .count()
    }

    pub fn get(&self, key: &RecordKey) -> Option<Record> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&mem_key(key))
            .cloned()
    }

    fn take_rejects(&self, batch_len: usize) -> usize {
        let mut pending = self.reject_next.lock().unwrap_or_else(PoisonError::into_inner);
        let rejected = (*pending).min(batch_len);
        *pending -= rejected;
        rejected
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(filter: &ScanFilter, record: &Record) -> bool {
    match filter {
        ScanFilter::All => true,
        ScanFilter::Partition(partition) => record.partition() == *partition,
        ScanFilter::ExcludeUsernames(usernames) => match record.str_field("username") {
            Some(username) => !usernames.iter().any(|keep| keep == username),
            None => true,
        },
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn query_page(
        &self,
        partition: Partition,
        start: Option<RecordKey>,
    ) -> Result<QueryPage, StoreError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let label = partition.as_str();
        let after = start.map(|key| mem_key(&key));

        let mut in_partition = items
            .iter()
            .filter(|((p, _), _)| p == label)
            .filter(|(key, _)| after.as_ref().is_none_or(|a| *key > a))
            .map(|(_, record)| record.clone());

        let records: Vec<Record> = in_partition.by_ref().take(self.page_size).collect();
        let next = if in_partition.next().is_some() {
            records.last().map(|record| record.key)
        } else {
            None
        };

        Ok(QueryPage { records, next })
    }

    async fn batch_put(&self, records: &[Record]) -> Result<usize, StoreError> {
        if records.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::Request(format!(
                "batch of {} exceeds the {MAX_BATCH_ITEMS}-item limit",
                records.len()
            )));
        }

        let rejected = self.take_rejects(records.len());
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        for record in &records[..records.len() - rejected] {
            items.insert(mem_key(&record.key), record.clone());
        }
        Ok(rejected)
    }

    async fn batch_delete(&self, keys: &[RecordKey]) -> Result<usize, StoreError> {
        if keys.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::Request(format!(
                "batch of {} exceeds the {MAX_BATCH_ITEMS}-item limit",
                keys.len()
            )));
        }

        let rejected = self.take_rejects(keys.len());
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        for key in &keys[..keys.len() - rejected] {
            items.remove(&mem_key(key));
        }
        Ok(rejected)
    }

    async fn scan_keys_page(
        &self,
        filter: &ScanFilter,
        start: Option<RecordKey>,
    ) -> Result<KeyPage, StoreError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let after = start.map(|key| mem_key(&key));

        let mut remaining = items
            .iter()
            .filter(|(key, _)| after.as_ref().is_none_or(|a| *key > a));

        let page: Vec<&Record> = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(_, record)| record)
            .collect();
        let scanned = page.len();
        let next = if remaining.next().is_some() {
            page.last().map(|record| record.key)
        } else {
            None
        };
        let keys = page
            .into_iter()
            .filter(|record| matches(filter, record))
            .map(|record| record.key)
            .collect();

        Ok(KeyPage {
            keys,
            scanned,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    fn student(username: &str) -> Record {
        let mut record = Record::new(Partition::Student);
        record.set_str("username", username);
        record
    }

    #[tokio::test]
    async fn test_put_then_query() {
        let store = MemoryStore::new();
        let records: Vec<Record> = (0..5).map(|_| student("alice")).collect();
        let unprocessed = store.batch_put(&records).await.unwrap();
        assert_eq!(unprocessed, 0);

        let page = store.query_page(Partition::Student, None).await.unwrap();
        assert_eq!(page.records.len(), 5);
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_query_pagination() {
        let store = MemoryStore::new().with_page_size(2);
        let records: Vec<Record> = (0..5).map(|_| student("bob")).collect();
        store.batch_put(&records).await.unwrap();

        let mut fetched = Vec::new();
        let mut token = None;
        loop {
            let page = store.query_page(Partition::Student, token).await.unwrap();
            fetched.extend(page.records);
            token = page.next;
            if token.is_none() {
                break;
            }
        }
        assert_eq!(fetched.len(), 5);
    }

    #[tokio::test]
    async fn test_reject_next_reports_unprocessed() {
        let store = MemoryStore::new();
        let records: Vec<Record> = (0..10).map(|_| student("carol")).collect();
        store.reject_next(3);
        let unprocessed = store.batch_put(&records).await.unwrap();
        assert_eq!(unprocessed, 3);
        assert_eq!(store.len(), 7);

        // The knob applies to one batch only.
        let unprocessed = store.batch_put(&records).await.unwrap();
        assert_eq!(unprocessed, 0);
    }

    #[tokio::test]
    async fn test_scan_excludes_kept_usernames() {
        let store = MemoryStore::new();
        let mut records = vec![student("keep-me"), student("drop-me"), student("drop-me-too")];
        let mut no_username = Record::new(Partition::Payment);
        no_username.set("paymentAmount", FieldValue::n(10000));
        records.push(no_username);
        store.batch_put(&records).await.unwrap();

        let filter = ScanFilter::ExcludeUsernames(vec!["keep-me".to_string()]);
        let page = store.scan_keys_page(&filter, None).await.unwrap();
        assert_eq!(page.scanned, 4);
        assert_eq!(page.keys.len(), 3);
    }

    #[tokio::test]
    async fn test_scan_by_partition() {
        let store = MemoryStore::new();
        let mut records: Vec<Record> = (0..3).map(|_| student("dave")).collect();
        records.push(Record::new(Partition::Exam));
        store.batch_put(&records).await.unwrap();

        let page = store
            .scan_keys_page(&ScanFilter::Partition(Partition::Exam), None)
            .await
            .unwrap();
        assert_eq!(page.keys.len(), 1);
        assert_eq!(page.keys[0].partition, Partition::Exam);
    }
}
