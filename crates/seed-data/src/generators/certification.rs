//! Certification generation for completed applications.

use certstore::model::{format_date, AuditStamp, Partition, Record, RecordId};
use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::errors::SeedError;
use crate::generators::application::PaymentStatus;
use crate::generators::audit::fixture_stamp;

/// Certificates stay valid this long after issue.
const VALIDITY_DAYS: i64 = 365 * 2;

/// Generated certification data ready for the batch writer.
#[derive(Debug, Clone)]
pub struct GeneratedCertification {
    pub id: RecordId,
    pub application_id: RecordId,
    pub student_id: RecordId,
    pub exam_id: RecordId,
    pub exam_name: String,
    pub issue_date: time::Date,
    pub expiration_date: time::Date,
    pub certification_number: String,
    pub memo: String,
    pub audit: AuditStamp,
}

impl GeneratedCertification {
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::Certification, self.id);
        record.set_str("applicationId", self.application_id.to_string());
        record.set_str("studentId", self.student_id.to_string());
        record.set_str("examId", self.exam_id.to_string());
        record.set_str("examName", self.exam_name.clone());
        record.set_str("issueDate", format_date(self.issue_date));
        record.set_str("expirationDate", format_date(self.expiration_date));
        record.set_str("certificationNumber", self.certification_number.clone());
        record.set_str("status", "active");
        record.set_str("memo", self.memo.clone());
        self.audit.write_to(&mut record);
        record
    }
}

/// Generates one certification per application whose payment completed.
/// Applications in any other payment state are skipped.
pub struct CertificationGenerator;

impl CertificationGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_batch(
        &self,
        applications: &[Record],
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedCertification>, SeedError> {
        if applications.is_empty() {
            return Err(SeedError::MissingParents(Partition::Application));
        }

        applications
            .iter()
            .filter(|application| {
                application.str_field("paymentStatus") == Some(PaymentStatus::Completed.as_str())
            })
            .map(|application| self.generate(application, now, rng))
            .collect()
    }

    fn generate(
        &self,
        application: &Record,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<GeneratedCertification, SeedError> {
        Ok(GeneratedCertification {
            id: RecordId::new(),
            application_id: application.id(),
            student_id: application.require_id("studentId")?,
            exam_id: application.require_id("examId")?,
            exam_name: application.require_str("examName")?.to_string(),
            issue_date: now.date(),
            expiration_date: now.date() + Duration::days(VALIDITY_DAYS),
            certification_number: format!(
                "CERT-{}-{}",
                rng.gen_range(1000..=9999),
                rng.gen_range(1000..=9999)
            ),
            memo: format!("Mock certification for application {}", application.id()),
            audit: fixture_stamp(now),
        })
    }
}

impl Default for CertificationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn application(status: PaymentStatus) -> Record {
        let mut record = Record::new(Partition::Application);
        record.set_str("studentId", RecordId::new().to_string());
        record.set_str("examId", RecordId::new().to_string());
        record.set_str("examName", "マイナンバー実務検定３級");
        record.set_str("paymentStatus", status.as_str());
        record
    }

    #[test]
    fn test_only_completed_applications_get_certificates() {
        let mut rng = StdRng::seed_from_u64(41);
        let now = OffsetDateTime::now_utc();

        let applications = vec![
            application(PaymentStatus::Completed),
            application(PaymentStatus::Pending),
            application(PaymentStatus::Completed),
            application(PaymentStatus::Failed),
            application(PaymentStatus::Completed),
        ];

        let certifications = CertificationGenerator::new()
            .generate_batch(&applications, now, &mut rng)
            .unwrap();

        assert_eq!(certifications.len(), 3);

        let completed_ids: HashSet<_> = applications
            .iter()
            .filter(|a| a.str_field("paymentStatus") == Some("completed"))
            .map(Record::id)
            .collect();
        let referenced: HashSet<_> = certifications.iter().map(|c| c.application_id).collect();
        assert_eq!(referenced, completed_ids);
    }

    #[test]
    fn test_expiration_is_two_years_out() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = OffsetDateTime::now_utc();

        let certifications = CertificationGenerator::new()
            .generate_batch(&[application(PaymentStatus::Completed)], now, &mut rng)
            .unwrap();

        let certification = &certifications[0];
        assert_eq!(
            certification.expiration_date - certification.issue_date,
            Duration::days(VALIDITY_DAYS)
        );

        let record = certification.to_record();
        assert_eq!(record.str_field("status"), Some("active"));
        assert!(record
            .str_field("certificationNumber")
            .unwrap()
            .starts_with("CERT-"));
    }

    #[test]
    fn test_empty_applications_is_a_precondition_failure() {
        let mut rng = StdRng::seed_from_u64(43);
        let result =
            CertificationGenerator::new().generate_batch(&[], OffsetDateTime::now_utc(), &mut rng);
        assert!(matches!(
            result,
            Err(SeedError::MissingParents(Partition::Application))
        ));
    }
}
