//! Paged reads of one entity type.

use tracing::{info, warn};

use crate::backend::StoreBackend;
use crate::errors::StoreError;
use crate::model::{Partition, Record};

/// Fetches every record carrying the given partition label, following the
/// continuation token until the store reports no further pages.
///
/// An empty table is not an error here; callers that need the records as
/// parents for another entity treat an empty result as a missing upstream
/// dependency and abort before writing anything.
pub async fn fetch_by_partition<S: StoreBackend + ?Sized>(
    store: &S,
    partition: Partition,
) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    let mut token = None;

    loop {
        let page = store.query_page(partition, token).await?;
        records.extend(page.records);
        token = page.next;
        if token.is_none() {
            break;
        }
    }

    if records.is_empty() {
        warn!("found 0 {partition} records");
    } else {
        info!("fetched {} {partition} records", records.len());
    }

    Ok(records)
}
