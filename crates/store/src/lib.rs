//! Store access layer for the exam-registry table.
//!
//! The table is a single DynamoDB-style key-value store addressed by a
//! composite key: a partition label naming the entity type plus a random
//! per-record identifier. This crate provides the record model, the typed
//! attribute codec, a backend trait with DynamoDB and in-memory
//! implementations, and the paged reader / batch writer / bulk deleter
//! used by the seed binaries.

pub mod backend;
pub mod config;
pub mod deleter;
pub mod errors;
pub mod model;
pub mod reader;
pub mod value;
pub mod writer;

pub use backend::{DynamoStore, MemoryStore, ScanFilter, StoreBackend, MAX_BATCH_ITEMS};
pub use config::StoreConfig;
pub use deleter::{BulkDeleter, DeleteReport, KeySweep};
pub use errors::StoreError;
pub use model::{AuditStamp, Partition, Record, RecordId, RecordKey};
pub use reader::fetch_by_partition;
pub use value::FieldValue;
pub use writer::{BatchWriter, WriteReport};
