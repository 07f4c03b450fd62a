//! Payment generation: one payment per application.

use certstore::model::{format_date, AuditStamp, Partition, Record, RecordId};
use certstore::StoreError;
use time::OffsetDateTime;

use crate::errors::SeedError;
use crate::generators::application::{PaymentMethod, PaymentStatus};
use crate::generators::audit::fixture_stamp;

/// Generated payment data ready for the batch writer. Amount, method,
/// and status are copied from the parent application.
#[derive(Debug, Clone)]
pub struct GeneratedPayment {
    pub id: RecordId,
    pub application_id: RecordId,
    pub student_id: RecordId,
    pub payment_date: time::Date,
    pub amount: u32,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub memo: String,
    pub audit: AuditStamp,
}

impl GeneratedPayment {
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::Payment, self.id);
        record.set_str("applicationId", self.application_id.to_string());
        record.set_str("studentId", self.student_id.to_string());
        record.set_str("paymentDate", format_date(self.payment_date));
        record.set_num("paymentAmount", self.amount);
        record.set_str("paymentMethod", self.method.as_str());
        record.set_str("status", self.status.as_str());
        record.set_str("memo", self.memo.clone());
        self.audit.write_to(&mut record);
        record
    }
}

/// Generates one payment per application.
pub struct PaymentGenerator;

impl PaymentGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_batch(
        &self,
        applications: &[Record],
        now: OffsetDateTime,
    ) -> Result<Vec<GeneratedPayment>, SeedError> {
        if applications.is_empty() {
            return Err(SeedError::MissingParents(Partition::Application));
        }

        applications
            .iter()
            .map(|application| self.generate(application, now))
            .collect()
    }

    fn generate(
        &self,
        application: &Record,
        now: OffsetDateTime,
    ) -> Result<GeneratedPayment, SeedError> {
        let method = parse_field(application, "paymentMethod", PaymentMethod::parse)?;
        let status = parse_field(application, "paymentStatus", PaymentStatus::parse)?;

        Ok(GeneratedPayment {
            id: RecordId::new(),
            application_id: application.id(),
            student_id: application.require_id("studentId")?,
            payment_date: now.date(),
            amount: application.require_num("totalFee")?,
            method,
            status,
            memo: format!("Mock payment for application {}", application.id()),
            audit: fixture_stamp(now),
        })
    }
}

impl Default for PaymentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_field<T>(
    record: &Record,
    field: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, SeedError> {
    let raw = record.require_str(field)?;
    parse(raw)
        .ok_or_else(|| StoreError::Codec(format!("unexpected {field} value `{raw}`")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(total_fee: u32, status: PaymentStatus) -> Record {
        let mut record = Record::new(Partition::Application);
        record.set_str("studentId", RecordId::new().to_string());
        record.set_num("totalFee", total_fee);
        record.set_str("paymentMethod", PaymentMethod::CreditCard.as_str());
        record.set_str("paymentStatus", status.as_str());
        record
    }

    #[test]
    fn test_amount_copies_the_application_total() {
        let now = OffsetDateTime::now_utc();
        let applications = vec![
            application(45000, PaymentStatus::Completed),
            application(8800, PaymentStatus::Pending),
        ];

        let payments = PaymentGenerator::new()
            .generate_batch(&applications, now)
            .unwrap();

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].amount, 45000);
        assert_eq!(payments[1].amount, 8800);
        assert_eq!(payments[0].application_id, applications[0].id());

        let record = payments[0].to_record();
        assert_eq!(record.num_field("paymentAmount"), Some(45000));
        assert_eq!(record.str_field("status"), Some("completed"));
    }

    #[test]
    fn test_empty_applications_is_a_precondition_failure() {
        let result = PaymentGenerator::new().generate_batch(&[], OffsetDateTime::now_utc());
        assert!(matches!(
            result,
            Err(SeedError::MissingParents(Partition::Application))
        ));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let mut record = application(1000, PaymentStatus::Pending);
        record.set_str("paymentStatus", "refunded");

        let result = PaymentGenerator::new().generate_batch(&[record], OffsetDateTime::now_utc());
        assert!(matches!(result, Err(SeedError::Store(_))));
    }
}
