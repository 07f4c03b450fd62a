//! Store backends.
//!
//! [`StoreBackend`] covers the four wire operations the seed tooling
//! needs: paged query by partition label, bulk insert, bulk delete, and a
//! paged key scan with an optional server-side filter. [`DynamoStore`]
//! talks to the real table; [`MemoryStore`] backs tests and dry runs.

pub mod dynamo;
pub mod memory;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::{Partition, Record, RecordKey};

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// The store's maximum atomic-batch size for bulk insert/delete calls.
pub const MAX_BATCH_ITEMS: usize = 25;

/// One page of a query, with the continuation key when more pages remain.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub records: Vec<Record>,
    pub next: Option<RecordKey>,
}

/// One page of a key scan.
#[derive(Debug, Clone)]
pub struct KeyPage {
    pub keys: Vec<RecordKey>,
    /// Items the store examined for this page, before filtering.
    pub scanned: usize,
    pub next: Option<RecordKey>,
}

/// Server-side filter applied while scanning for deletion candidates.
#[derive(Debug, Clone)]
pub enum ScanFilter {
    /// Every item in the table.
    All,
    /// Items carrying the given partition label.
    Partition(Partition),
    /// Items whose `username` attribute is NOT one of the given values.
    /// Items without a `username` attribute match.
    ExcludeUsernames(Vec<String>),
}

/// Low-level store operations.
///
/// `batch_put` and `batch_delete` take at most [`MAX_BATCH_ITEMS`] items
/// and return the number the store reported as unprocessed; callers chunk
/// and decide what to do about the leftovers.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn query_page(
        &self,
        partition: Partition,
        start: Option<RecordKey>,
    ) -> Result<QueryPage, StoreError>;

    async fn batch_put(&self, records: &[Record]) -> Result<usize, StoreError>;

    async fn batch_delete(&self, keys: &[RecordKey]) -> Result<usize, StoreError>;

    async fn scan_keys_page(
        &self,
        filter: &ScanFilter,
        start: Option<RecordKey>,
    ) -> Result<KeyPage, StoreError>;
}
