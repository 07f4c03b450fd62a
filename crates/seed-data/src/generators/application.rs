//! Application generation: one application per student.

use certstore::model::{format_date, AuditStamp, Partition, Record, RecordId};
use certstore::value::FieldValue;
use rand::Rng;
use time::OffsetDateTime;

use crate::errors::SeedError;
use crate::generators::audit::fixture_stamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Generated application data ready for the batch writer.
///
/// Exam name, date, venue allocation, and fees are a snapshot of the
/// chosen session at application time.
#[derive(Debug, Clone)]
pub struct GeneratedApplication {
    pub id: RecordId,
    pub student_id: RecordId,
    pub exam_hold_id: RecordId,
    pub exam_id: RecordId,
    pub exam_name: String,
    pub exam_date: String,
    pub exam_place: Option<FieldValue>,
    pub application_date: time::Date,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub exam_fee: Option<u32>,
    pub lesson_fee: Option<u32>,
    pub certification_fee: Option<u32>,
    pub total_fee: u32,
    pub memo: String,
    pub audit: AuditStamp,
}

impl GeneratedApplication {
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::Application, self.id);
        record.set_str("studentId", self.student_id.to_string());
        record.set_str("examHoldId", self.exam_hold_id.to_string());
        record.set_str("examId", self.exam_id.to_string());
        record.set_str("examName", self.exam_name.clone());
        record.set_str("examDate", self.exam_date.clone());
        if let Some(place) = &self.exam_place {
            record.set("examPlace", place.clone());
        }
        record.set_str("applicationDate", format_date(self.application_date));
        record.set_str("paymentMethod", self.payment_method.as_str());
        record.set_str("paymentStatus", self.payment_status.as_str());
        record.set_opt_num("examFee", self.exam_fee);
        record.set_opt_num("lessonFee", self.lesson_fee);
        record.set_opt_num("certificationFee", self.certification_fee);
        record.set_num("totalFee", self.total_fee);
        record.set_str("memo", self.memo.clone());
        self.audit.write_to(&mut record);
        record
    }
}

/// Generates one application per student, each against a uniformly random
/// session.
pub struct ApplicationGenerator;

impl ApplicationGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_batch(
        &self,
        students: &[Record],
        sessions: &[Record],
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<GeneratedApplication>, SeedError> {
        if students.is_empty() {
            return Err(SeedError::MissingParents(Partition::Student));
        }
        if sessions.is_empty() {
            return Err(SeedError::MissingParents(Partition::ExamSession));
        }

        students
            .iter()
            .map(|student| {
                let session = &sessions[rng.gen_range(0..sessions.len())];
                self.generate(student, session, now, rng)
            })
            .collect()
    }

    fn generate(
        &self,
        student: &Record,
        session: &Record,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<GeneratedApplication, SeedError> {
        let exam_fee = session.num_field("examFee");
        let lesson_fee = session.num_field("lessonFee");
        let certification_fee = session.num_field("certificationFee");
        let total_fee = exam_fee.unwrap_or(0) + lesson_fee.unwrap_or(0)
            + certification_fee.unwrap_or(0);

        let payment_method = if rng.r#gen::<bool>() {
            PaymentMethod::CreditCard
        } else {
            PaymentMethod::BankTransfer
        };
        let payment_status = match rng.gen_range(0..3) {
            0 => PaymentStatus::Pending,
            1 => PaymentStatus::Completed,
            _ => PaymentStatus::Failed,
        };

        let first_name = student.str_field("firstName").unwrap_or("");
        let last_name = student.str_field("lastName").unwrap_or("");

        Ok(GeneratedApplication {
            id: RecordId::new(),
            student_id: student.id(),
            exam_hold_id: session.id(),
            exam_id: session.require_id("examId")?,
            exam_name: session.require_str("examName")?.to_string(),
            exam_date: session.require_str("examHoldDate")?.to_string(),
            exam_place: session.get("examHoldPlace").cloned(),
            application_date: now.date(),
            payment_method,
            payment_status,
            exam_fee,
            lesson_fee,
            certification_fee,
            total_fee,
            memo: format!("Mock application for {first_name} {last_name}"),
            audit: fixture_stamp(now),
        })
    }
}

impl Default for ApplicationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session_with_fees(
        exam_fee: Option<u32>,
        lesson_fee: Option<u32>,
        certification_fee: Option<u32>,
    ) -> Record {
        let mut session = Record::new(Partition::ExamSession);
        session.set_str("examId", RecordId::new().to_string());
        session.set_str("examName", "給与実務能力検定試験２級");
        session.set_str("examHoldDate", "2026-11-15");
        session.set_opt_num("examFee", exam_fee);
        session.set_opt_num("lessonFee", lesson_fee);
        session.set_opt_num("certificationFee", certification_fee);
        session
    }

    fn students(count: usize) -> Vec<Record> {
        (0..count)
            .map(|i| {
                let mut student = Record::new(Partition::Student);
                student.set_str("firstName", format!("太郎{i}"));
                student.set_str("lastName", "山田");
                student
            })
            .collect()
    }

    #[test]
    fn test_total_fee_sums_present_fees() {
        let mut rng = StdRng::seed_from_u64(31);
        let now = OffsetDateTime::now_utc();
        let sessions = vec![session_with_fees(Some(10000), Some(33000), Some(2000))];

        let applications = ApplicationGenerator::new()
            .generate_batch(&students(5), &sessions, now, &mut rng)
            .unwrap();

        for application in &applications {
            assert_eq!(application.total_fee, 45000);
        }
    }

    #[test]
    fn test_absent_fees_count_as_zero() {
        let mut rng = StdRng::seed_from_u64(32);
        let now = OffsetDateTime::now_utc();
        let sessions = vec![session_with_fees(Some(8800), None, None)];

        let applications = ApplicationGenerator::new()
            .generate_batch(&students(3), &sessions, now, &mut rng)
            .unwrap();

        for application in &applications {
            assert_eq!(application.total_fee, 8800);
            let record = application.to_record();
            assert_eq!(record.num_field("totalFee"), Some(8800));
            assert!(record.get("lessonFee").is_none());
        }
    }

    #[test]
    fn test_one_application_per_student() {
        let mut rng = StdRng::seed_from_u64(33);
        let now = OffsetDateTime::now_utc();
        let sessions = vec![
            session_with_fees(Some(5500), None, Some(3000)),
            session_with_fees(Some(7700), None, Some(1500)),
        ];
        let parents = students(20);

        let applications = ApplicationGenerator::new()
            .generate_batch(&parents, &sessions, now, &mut rng)
            .unwrap();

        assert_eq!(applications.len(), 20);
        let student_ids: std::collections::HashSet<_> =
            applications.iter().map(|a| a.student_id).collect();
        assert_eq!(student_ids.len(), 20);

        let session_ids: std::collections::HashSet<_> =
            sessions.iter().map(Record::id).collect();
        for application in &applications {
            assert!(session_ids.contains(&application.exam_hold_id));
        }
    }

    #[test]
    fn test_missing_parents_fail() {
        let mut rng = StdRng::seed_from_u64(34);
        let now = OffsetDateTime::now_utc();
        let generator = ApplicationGenerator::new();

        assert!(matches!(
            generator.generate_batch(&[], &[session_with_fees(None, None, None)], now, &mut rng),
            Err(SeedError::MissingParents(Partition::Student))
        ));
        assert!(matches!(
            generator.generate_batch(&students(2), &[], now, &mut rng),
            Err(SeedError::MissingParents(Partition::ExamSession))
        ));
    }
}
