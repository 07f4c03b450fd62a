//! Record model for the exam-registry table.
//!
//! Every item in the table is addressed by a composite key: a partition
//! label naming the entity type plus a per-record random identifier.
//! Foreign keys between entities are plain references to another record's
//! identifier; the store enforces nothing, so generators are responsible
//! for only ever emitting references to records they were handed.

use std::collections::BTreeMap;
use std::fmt;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::value::FieldValue;

/// Wire name of the partition-label key attribute.
pub const PARTITION_KEY_ATTR: &str = "partitionKey";
/// Wire name of the record-identifier key attribute.
pub const SORT_KEY_ATTR: &str = "sortKey";

/// Entity-type discriminator used as the partition half of the composite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Student,
    Venue,
    BankAccount,
    Exam,
    ExamSession,
    Application,
    Payment,
    Certification,
}

impl Partition {
    /// Returns the label stored in the partition-key attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Student => "STUDENT",
            Partition::Venue => "EXAM_PLACE",
            Partition::BankAccount => "BANK_ACCOUNT",
            Partition::Exam => "EXAM",
            Partition::ExamSession => "EXAM_HOLD",
            Partition::Application => "APPLICATION",
            Partition::Payment => "PAYMENT",
            Partition::Certification => "CERTIFICATION",
        }
    }

    /// Parses a partition label read back from the store.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "STUDENT" => Some(Partition::Student),
            "EXAM_PLACE" => Some(Partition::Venue),
            "BANK_ACCOUNT" => Some(Partition::BankAccount),
            "EXAM" => Some(Partition::Exam),
            "EXAM_HOLD" => Some(Partition::ExamSession),
            "APPLICATION" => Some(Partition::Application),
            "PAYMENT" => Some(Partition::Payment),
            "CERTIFICATION" => Some(Partition::Certification),
            _ => None,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Random per-record identifier, unique store-wide and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier read back from the store.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|e| StoreError::Codec(format!("invalid record id `{value}`: {e}")))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Composite key addressing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub partition: Partition,
    pub id: RecordId,
}

impl RecordKey {
    pub fn new(partition: Partition, id: RecordId) -> Self {
        Self { partition, id }
    }
}

/// One table item: composite key plus named field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: RecordKey,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record with a freshly generated identifier.
    pub fn new(partition: Partition) -> Self {
        Self::with_id(partition, RecordId::new())
    }

    /// Creates an empty record with a caller-supplied identifier.
    pub fn with_id(partition: Partition, id: RecordId) -> Self {
        Self {
            key: RecordKey::new(partition, id),
            fields: BTreeMap::new(),
        }
    }

    pub fn partition(&self) -> Partition {
        self.key.partition
    }

    pub fn id(&self) -> RecordId {
        self.key.id
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn set_str(&mut self, name: &str, value: impl Into<String>) {
        self.set(name, FieldValue::s(value));
    }

    /// Sets a string field, omitting it entirely when the value is absent.
    pub fn set_opt_str<S: Into<String>>(&mut self, name: &str, value: Option<S>) {
        if let Some(value) = value {
            self.set_str(name, value);
        }
    }

    pub fn set_num(&mut self, name: &str, value: u32) {
        self.set(name, FieldValue::n(value));
    }

    pub fn set_opt_num(&mut self, name: &str, value: Option<u32>) {
        if let Some(value) = value {
            self.set_num(name, value);
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set(name, FieldValue::Bool(value));
    }

    pub fn set_list(&mut self, name: &str, items: Vec<FieldValue>) {
        self.set(name, FieldValue::L(items));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn num_field(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(FieldValue::as_u32)
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn list_field(&self, name: &str) -> Option<&[FieldValue]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    pub fn require_str(&self, field: &'static str) -> Result<&str, StoreError> {
        self.str_field(field).ok_or(StoreError::MissingAttribute {
            partition: self.key.partition.as_str(),
            field,
        })
    }

    pub fn require_num(&self, field: &'static str) -> Result<u32, StoreError> {
        self.num_field(field).ok_or(StoreError::MissingAttribute {
            partition: self.key.partition.as_str(),
            field,
        })
    }

    /// Reads a foreign-key field and parses it into a typed identifier.
    pub fn require_id(&self, field: &'static str) -> Result<RecordId, StoreError> {
        RecordId::parse(self.require_str(field)?)
    }
}

/// Creator/modifier identity pair stamped onto every record.
///
/// `updated_on` never precedes `created_on`; seeders that fabricate a
/// modification history pick `updated_on` inside `[created_on, now]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditStamp {
    pub created_by: String,
    pub created_on: OffsetDateTime,
    pub updated_by: String,
    pub updated_on: OffsetDateTime,
}

impl AuditStamp {
    /// Stamp for a record created and last touched by the same actor.
    pub fn new(actor: impl Into<String>, at: OffsetDateTime) -> Self {
        let actor = actor.into();
        Self {
            created_by: actor.clone(),
            created_on: at,
            updated_by: actor,
            updated_on: at,
        }
    }

    pub fn write_to(&self, record: &mut Record) {
        record.set_str("createdBy", self.created_by.clone());
        record.set_str("createdOn", format_timestamp(self.created_on));
        record.set_str("updatedBy", self.updated_by.clone());
        record.set_str("updatedOn", format_timestamp(self.updated_on));
    }
}

/// Formats a timestamp the way the table stores them (RFC 3339, UTC).
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    let fmt = format_description!("[year]-[month]-[day]");
    date.format(&fmt).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_partition_labels_round_trip() {
        for partition in [
            Partition::Student,
            Partition::Venue,
            Partition::BankAccount,
            Partition::Exam,
            Partition::ExamSession,
            Partition::Application,
            Partition::Payment,
            Partition::Certification,
        ] {
            assert_eq!(Partition::parse(partition.as_str()), Some(partition));
        }
        assert_eq!(Partition::parse("UNKNOWN"), None);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..100).map(|_| RecordId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_record_id_parse_rejects_garbage() {
        assert!(RecordId::parse("not-a-uuid").is_err());
        let id = RecordId::new();
        assert_eq!(RecordId::parse(&id.to_string()).ok(), Some(id));
    }

    #[test]
    fn test_optional_setters_omit_absent_values() {
        let mut record = Record::new(Partition::Exam);
        record.set_opt_num("examFee", Some(10000));
        record.set_opt_num("specialFee", None);
        record.set_opt_str("memo", None::<String>);

        assert_eq!(record.num_field("examFee"), Some(10000));
        assert!(record.get("specialFee").is_none());
        assert!(record.get("memo").is_none());
    }

    #[test]
    fn test_require_reports_partition_and_field() {
        let record = Record::new(Partition::Application);
        let err = record.require_str("examId").unwrap_err();
        match err {
            StoreError::MissingAttribute { partition, field } => {
                assert_eq!(partition, "APPLICATION");
                assert_eq!(field, "examId");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(format_date(date!(2026 - 03 - 07)), "2026-03-07");
        assert_eq!(
            format_timestamp(datetime!(2026-03-07 12:30:00 UTC)),
            "2026-03-07T12:30:00Z"
        );
    }
}
