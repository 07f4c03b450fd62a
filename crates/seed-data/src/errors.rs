use certstore::model::Partition;
use certstore::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("no {0} records found; run the upstream seeder first")]
    MissingParents(Partition),
}
