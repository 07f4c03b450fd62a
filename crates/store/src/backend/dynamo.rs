//! DynamoDB backend.
//!
//! Wire attribute names: `partitionKey` (entity label) and `sortKey`
//! (record identifier), plus one attribute per record field in the
//! store's tagged encoding.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use async_trait::async_trait;
use tracing::info;

use crate::backend::{KeyPage, QueryPage, ScanFilter, StoreBackend, MAX_BATCH_ITEMS};
use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::model::{Partition, Record, RecordId, RecordKey, PARTITION_KEY_ATTR, SORT_KEY_ATTR};
use crate::value::FieldValue;

/// DynamoDB-backed store.
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    /// Connects using the SDK's default credential chain, honouring the
    /// endpoint override for local store instances.
    pub async fn connect(config: &StoreConfig) -> Self {
        let base = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = if let Some(endpoint) = &config.endpoint_url {
            let store_config = aws_sdk_dynamodb::config::Builder::from(&base)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(store_config)
        } else {
            Client::new(&base)
        };

        info!(table = %config.table, "connected to DynamoDB");

        Self {
            client,
            table: config.table.clone(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl StoreBackend for DynamoStore {
    async fn query_page(
        &self,
        partition: Partition,
        start: Option<RecordKey>,
    ) -> Result<QueryPage, StoreError> {
        let mut request = self
            .client
            .query()
            .table_name(&self.table)
            .key_condition_expression("partitionKey = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(partition.as_str().to_string()));

        if let Some(start) = start {
            request = request.set_exclusive_start_key(Some(key_attributes(&start)));
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Request(format!("query failed: {e}")))?;

        let records = response
            .items()
            .iter()
            .map(decode_record)
            .collect::<Result<Vec<_>, _>>()?;
        let next = response.last_evaluated_key().map(decode_key).transpose()?;

        Ok(QueryPage { records, next })
    }

    async fn batch_put(&self, records: &[Record]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        if records.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::Request(format!(
                "batch of {} exceeds the {MAX_BATCH_ITEMS}-item limit",
                records.len()
            )));
        }

        let requests = records
            .iter()
            .map(|record| {
                let put = PutRequest::builder()
                    .set_item(Some(encode_record(record)))
                    .build()
                    .map_err(|e| StoreError::Request(format!("invalid put request: {e}")))?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let response = self
            .client
            .batch_write_item()
            .request_items(self.table.clone(), requests)
            .send()
            .await
            .map_err(|e| StoreError::Request(format!("batch write failed: {e}")))?;

        Ok(unprocessed_count(response.unprocessed_items(), &self.table))
    }

    async fn batch_delete(&self, keys: &[RecordKey]) -> Result<usize, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        if keys.len() > MAX_BATCH_ITEMS {
            return Err(StoreError::Request(format!(
                "batch of {} exceeds the {MAX_BATCH_ITEMS}-item limit",
                keys.len()
            )));
        }

        let requests = keys
            .iter()
            .map(|key| {
                let delete = DeleteRequest::builder()
                    .set_key(Some(key_attributes(key)))
                    .build()
                    .map_err(|e| StoreError::Request(format!("invalid delete request: {e}")))?;
                Ok(WriteRequest::builder().delete_request(delete).build())
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let response = self
            .client
            .batch_write_item()
            .request_items(self.table.clone(), requests)
            .send()
            .await
            .map_err(|e| StoreError::Request(format!("batch delete failed: {e}")))?;

        Ok(unprocessed_count(response.unprocessed_items(), &self.table))
    }

    async fn scan_keys_page(
        &self,
        filter: &ScanFilter,
        start: Option<RecordKey>,
    ) -> Result<KeyPage, StoreError> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.table)
            .projection_expression("partitionKey, sortKey");

        match filter {
            ScanFilter::All => {}
            ScanFilter::Partition(partition) => {
                request = request
                    .filter_expression("partitionKey = :pk")
                    .expression_attribute_values(
                        ":pk",
                        AttributeValue::S(partition.as_str().to_string()),
                    );
            }
            ScanFilter::ExcludeUsernames(usernames) if usernames.is_empty() => {}
            ScanFilter::ExcludeUsernames(usernames) => {
                let clauses: Vec<String> = (0..usernames.len())
                    .map(|i| format!("username = :u{i}"))
                    .collect();
                request = request.filter_expression(format!("NOT ({})", clauses.join(" OR ")));
                for (i, username) in usernames.iter().enumerate() {
                    request = request.expression_attribute_values(
                        format!(":u{i}"),
                        AttributeValue::S(username.clone()),
                    );
                }
            }
        }

        if let Some(start) = start {
            request = request.set_exclusive_start_key(Some(key_attributes(&start)));
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Request(format!("scan failed: {e}")))?;

        let keys = response
            .items()
            .iter()
            .map(decode_key)
            .collect::<Result<Vec<_>, _>>()?;
        let scanned = usize::try_from(response.scanned_count()).unwrap_or(0);
        let next = response.last_evaluated_key().map(decode_key).transpose()?;

        Ok(KeyPage {
            keys,
            scanned,
            next,
        })
    }
}

fn unprocessed_count(
    unprocessed: Option<&HashMap<String, Vec<WriteRequest>>>,
    table: &str,
) -> usize {
    unprocessed
        .and_then(|items| items.get(table))
        .map_or(0, Vec::len)
}

/// Encodes a field value into the SDK attribute type.
pub fn encode_value(value: &FieldValue) -> AttributeValue {
    match value {
        FieldValue::S(s) => AttributeValue::S(s.clone()),
        FieldValue::N(n) => AttributeValue::N(n.clone()),
        FieldValue::Bool(b) => AttributeValue::Bool(*b),
        FieldValue::L(items) => AttributeValue::L(items.iter().map(encode_value).collect()),
        FieldValue::M(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect(),
        ),
    }
}

/// Decodes an SDK attribute back into a plain field value.
pub fn decode_value(attr: &AttributeValue) -> Result<FieldValue, StoreError> {
    match attr {
        AttributeValue::S(s) => Ok(FieldValue::S(s.clone())),
        AttributeValue::N(n) => Ok(FieldValue::N(n.clone())),
        AttributeValue::Bool(b) => Ok(FieldValue::Bool(*b)),
        AttributeValue::L(items) => Ok(FieldValue::L(
            items.iter().map(decode_value).collect::<Result<_, _>>()?,
        )),
        AttributeValue::M(map) => Ok(FieldValue::M(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
                .collect::<Result<_, StoreError>>()?,
        )),
        other => Err(StoreError::Codec(format!(
            "unsupported attribute type: {other:?}"
        ))),
    }
}

/// Encodes a record, key attributes included, into a store item.
pub fn encode_record(record: &Record) -> HashMap<String, AttributeValue> {
    let mut item = key_attributes(&record.key);
    for (name, value) in &record.fields {
        item.insert(name.clone(), encode_value(value));
    }
    item
}

/// Decodes a store item into a record, separating out the key attributes.
pub fn decode_record(item: &HashMap<String, AttributeValue>) -> Result<Record, StoreError> {
    let key = decode_key(item)?;
    let mut record = Record::with_id(key.partition, key.id);
    for (name, attr) in item {
        if name == PARTITION_KEY_ATTR || name == SORT_KEY_ATTR {
            continue;
        }
        record.set(name, decode_value(attr)?);
    }
    Ok(record)
}

fn key_attributes(key: &RecordKey) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            PARTITION_KEY_ATTR.to_string(),
            AttributeValue::S(key.partition.as_str().to_string()),
        ),
        (
            SORT_KEY_ATTR.to_string(),
            AttributeValue::S(key.id.to_string()),
        ),
    ])
}

fn decode_key(item: &HashMap<String, AttributeValue>) -> Result<RecordKey, StoreError> {
    let label = item
        .get(PARTITION_KEY_ATTR)
        .and_then(|attr| attr.as_s().ok())
        .ok_or_else(|| StoreError::Codec("item without a partition key".to_string()))?;
    let partition = Partition::parse(label)
        .ok_or_else(|| StoreError::Codec(format!("unknown partition label `{label}`")))?;

    let id = item
        .get(SORT_KEY_ATTR)
        .and_then(|attr| attr.as_s().ok())
        .ok_or_else(|| StoreError::Codec("item without a sort key".to_string()))?;

    Ok(RecordKey::new(partition, RecordId::parse(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_record() -> Record {
        let mut record = Record::new(Partition::ExamSession);
        record.set_str("examName", "給与実務能力検定試験２級");
        record.set_num("examHoldNo", 3);
        record.set_bool("examHoldActivation", true);
        record.set_list(
            "examHoldPlace",
            vec![FieldValue::M(BTreeMap::from([
                ("placeId".to_string(), FieldValue::s("a7f1c2d4-0000-4000-8000-000000000001")),
                ("capacity".to_string(), FieldValue::n(120)),
            ]))],
        );
        record
    }

    #[test]
    fn test_record_round_trip() {
        let record = sample_record();
        let item = encode_record(&record);
        let decoded = decode_record(&item).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encoded_item_carries_key_attributes() {
        let record = sample_record();
        let item = encode_record(&record);
        assert_eq!(
            item.get(PARTITION_KEY_ATTR),
            Some(&AttributeValue::S("EXAM_HOLD".to_string()))
        );
        assert_eq!(
            item.get(SORT_KEY_ATTR),
            Some(&AttributeValue::S(record.id().to_string()))
        );
    }

    #[test]
    fn test_decode_rejects_unknown_partition() {
        let item = HashMap::from([
            (
                PARTITION_KEY_ATTR.to_string(),
                AttributeValue::S("MYSTERY".to_string()),
            ),
            (
                SORT_KEY_ATTR.to_string(),
                AttributeValue::S(RecordId::new().to_string()),
            ),
        ]);
        assert!(decode_record(&item).is_err());
    }

    #[test]
    fn test_nested_value_round_trip() {
        let value = FieldValue::L(vec![
            FieldValue::s("筆記用具"),
            FieldValue::M(BTreeMap::from([(
                "passingScore".to_string(),
                FieldValue::n(70),
            )])),
        ]);
        assert_eq!(decode_value(&encode_value(&value)).unwrap(), value);
    }
}
