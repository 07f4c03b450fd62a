//! Curated exam fixtures, linked to existing bank accounts.

use std::collections::BTreeMap;

use certstore::model::{AuditStamp, Partition, Record, RecordId};
use certstore::value::FieldValue;
use rand::Rng;
use time::OffsetDateTime;

use crate::errors::SeedError;
use crate::generators::audit::fixture_stamp;

/// One row of the scoring rubric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBand {
    pub label: String,
    pub max_score: u32,
    pub passing_score: u32,
}

impl ScoreBand {
    pub fn new(label: impl Into<String>, max_score: u32, passing_score: u32) -> Self {
        Self {
            label: label.into(),
            max_score,
            passing_score,
        }
    }

    pub fn to_value(&self) -> FieldValue {
        FieldValue::M(BTreeMap::from([
            ("display_name".to_string(), FieldValue::s(self.label.clone())),
            ("perfectScore".to_string(), FieldValue::n(self.max_score)),
            ("passingScore".to_string(), FieldValue::n(self.passing_score)),
        ]))
    }
}

/// Who a renewal offering applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalMode {
    Everyone,
    RequestOnly,
    None,
}

impl RenewalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalMode::Everyone => "everyone",
            RenewalMode::RequestOnly => "request_only",
            RenewalMode::None => "none",
        }
    }
}

/// Certificate issuance policy.
#[derive(Debug, Clone)]
pub struct CertificationPolicy {
    pub certification_type: RenewalMode,
    pub temporary_deadline: bool,
    pub shipped_days: u32,
    pub prefix: String,
    pub license_expiration_years: Option<u32>,
}

/// Fee schedule. A `None` fee is "not offered" and is treated as zero
/// wherever fees are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeSchedule {
    pub exam: Option<u32>,
    pub student: Option<u32>,
    pub group: Option<u32>,
    pub lesson: Option<u32>,
    pub certification: Option<u32>,
    pub renewal: Option<u32>,
    pub renew_text: Option<u32>,
    pub renew_lesson: Option<u32>,
    pub special: Option<u32>,
}

impl FeeSchedule {
    pub fn write_to(&self, record: &mut Record) {
        record.set_opt_num("examFee", self.exam);
        record.set_opt_num("studentFee", self.student);
        record.set_opt_num("groupFee", self.group);
        record.set_opt_num("lessonFee", self.lesson);
        record.set_opt_num("certificationFee", self.certification);
        record.set_opt_num("renewalFee", self.renewal);
        record.set_opt_num("renewTextFee", self.renew_text);
        record.set_opt_num("renewLessonFee", self.renew_lesson);
        record.set_opt_num("specialFee", self.special);
    }
}

/// Generated exam data ready for the batch writer.
#[derive(Debug, Clone)]
pub struct GeneratedExam {
    pub id: RecordId,
    pub exam_name: String,
    pub time_required_minutes: u32,
    pub score: Vec<ScoreBand>,
    pub score_comment: Option<String>,
    pub exam_items: Vec<String>,
    pub face_img_required: bool,
    pub lesson: bool,
    pub certification: CertificationPolicy,
    pub renew_text: RenewalMode,
    pub renew_text_inclusion: Option<bool>,
    pub renew_lesson: RenewalMode,
    pub renew_lesson_inclusion: Option<bool>,
    pub revision_law_information: bool,
    pub fees: FeeSchedule,
    pub bank_account_id: RecordId,
    pub exam_url: Option<String>,
    pub memo: Option<String>,
    pub audit: AuditStamp,
}

impl GeneratedExam {
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::Exam, self.id);
        record.set_str("examName", self.exam_name.clone());
        record.set_num("timeRequired", self.time_required_minutes);
        record.set_list("score", self.score.iter().map(ScoreBand::to_value).collect());
        record.set_opt_str("scoreComment", self.score_comment.clone());
        record.set_list(
            "examItems",
            self.exam_items.iter().cloned().map(FieldValue::S).collect(),
        );
        record.set_bool("faceImgRequired", self.face_img_required);
        record.set_bool("lesson", self.lesson);
        record.set_str("certificationType", self.certification.certification_type.as_str());
        record.set_bool(
            "certificationTemporaryDeadline",
            self.certification.temporary_deadline,
        );
        record.set_num("certificationShipped", self.certification.shipped_days);
        record.set_str("certificationPrefix", self.certification.prefix.clone());
        record.set_opt_num(
            "licenseExpirationDate",
            self.certification.license_expiration_years,
        );
        record.set_str("renewText", self.renew_text.as_str());
        if let Some(included) = self.renew_text_inclusion {
            record.set_bool("renewTextInclusion", included);
        }
        record.set_str("renewLesson", self.renew_lesson.as_str());
        if let Some(included) = self.renew_lesson_inclusion {
            record.set_bool("renewLessonInclusion", included);
        }
        record.set_bool("revisionLawInformation", self.revision_law_information);
        self.fees.write_to(&mut record);
        record.set_str("bankAccountId", self.bank_account_id.to_string());
        record.set_opt_str("examUrl", self.exam_url.clone());
        record.set_opt_str("memo", self.memo.clone());
        self.audit.write_to(&mut record);
        record
    }
}

fn pick_account(accounts: &[RecordId], rng: &mut impl Rng) -> RecordId {
    accounts[rng.gen_range(0..accounts.len())]
}

/// Returns the curated list of four exams, each linked to a uniformly
/// random account from `bank_accounts`. An empty account set is a
/// precondition failure; no exam is ever emitted without a valid link.
pub fn exam_fixtures(
    bank_accounts: &[RecordId],
    now: OffsetDateTime,
    rng: &mut impl Rng,
) -> Result<Vec<GeneratedExam>, SeedError> {
    if bank_accounts.is_empty() {
        return Err(SeedError::MissingParents(Partition::BankAccount));
    }

    let exams = vec![
        GeneratedExam {
            id: RecordId::new(),
            exam_name: "給与実務能力検定試験２級".to_string(),
            time_required_minutes: 120,
            score: vec![
                ScoreBand::new("知識問題", 70, 50),
                ScoreBand::new("計算問題", 30, 20),
            ],
            score_comment: Some(
                "知識問題・計算問題それぞれの得点が配点の40%に満たない場合は、総合得点が合格基準に達していても不合格となります。"
                    .to_string(),
            ),
            exam_items: vec![
                "筆記用具".to_string(),
                "電卓".to_string(),
                "本人確認書類".to_string(),
            ],
            face_img_required: true,
            lesson: true,
            certification: CertificationPolicy {
                certification_type: RenewalMode::Everyone,
                temporary_deadline: true,
                shipped_days: 14,
                prefix: "KYU".to_string(),
                license_expiration_years: Some(2),
            },
            renew_text: RenewalMode::RequestOnly,
            renew_text_inclusion: Some(false),
            renew_lesson: RenewalMode::RequestOnly,
            renew_lesson_inclusion: Some(false),
            revision_law_information: true,
            fees: FeeSchedule {
                exam: Some(10000),
                student: Some(8000),
                group: Some(9000),
                lesson: Some(33000),
                certification: Some(2000),
                renewal: Some(5000),
                renew_text: Some(3000),
                renew_lesson: Some(15000),
                special: None,
            },
            bank_account_id: pick_account(bank_accounts, rng),
            exam_url: Some("https://www.jitsumu-up.jp/com_contents/kyuyo/".to_string()),
            memo: Some("2級は、社会保険や税に関するより詳細な知識が問われます。".to_string()),
            audit: fixture_stamp(now),
        },
        GeneratedExam {
            id: RecordId::new(),
            exam_name: "シニアライフ・相続アドバイザー".to_string(),
            time_required_minutes: 60,
            score: vec![ScoreBand::new("総合得点", 100, 70)],
            score_comment: None,
            exam_items: vec!["筆記用具".to_string(), "本人確認書類".to_string()],
            face_img_required: true,
            lesson: false,
            certification: CertificationPolicy {
                certification_type: RenewalMode::Everyone,
                temporary_deadline: false,
                shipped_days: 21,
                prefix: "SLS".to_string(),
                license_expiration_years: Some(1),
            },
            renew_text: RenewalMode::None,
            renew_text_inclusion: None,
            renew_lesson: RenewalMode::Everyone,
            renew_lesson_inclusion: Some(true),
            revision_law_information: true,
            fees: FeeSchedule {
                exam: Some(8800),
                group: Some(7700),
                certification: Some(1500),
                renewal: Some(11000),
                ..FeeSchedule::default()
            },
            bank_account_id: pick_account(bank_accounts, rng),
            exam_url: Some("https://www.jitsumu-up.jp/com_contents/seniorlife/".to_string()),
            memo: None,
            audit: fixture_stamp(now),
        },
        GeneratedExam {
            id: RecordId::new(),
            exam_name: "クレーム対応検定".to_string(),
            time_required_minutes: 50,
            score: vec![ScoreBand::new("総合得点", 100, 80)],
            score_comment: None,
            exam_items: Vec::new(),
            face_img_required: false,
            lesson: true,
            certification: CertificationPolicy {
                certification_type: RenewalMode::RequestOnly,
                temporary_deadline: false,
                shipped_days: 10,
                prefix: "CLM".to_string(),
                license_expiration_years: None,
            },
            renew_text: RenewalMode::None,
            renew_text_inclusion: None,
            renew_lesson: RenewalMode::None,
            renew_lesson_inclusion: None,
            revision_law_information: false,
            fees: FeeSchedule {
                exam: Some(5500),
                lesson: Some(20000),
                certification: Some(3000),
                ..FeeSchedule::default()
            },
            bank_account_id: pick_account(bank_accounts, rng),
            exam_url: Some("https://www.jitsumu-up.jp/com_contents/claim/".to_string()),
            memo: Some("オンラインでのみ実施。".to_string()),
            audit: fixture_stamp(now),
        },
        GeneratedExam {
            id: RecordId::new(),
            exam_name: "マイナンバー実務検定３級".to_string(),
            time_required_minutes: 60,
            score: vec![ScoreBand::new("総合得点", 100, 70)],
            score_comment: None,
            exam_items: vec!["筆記用具".to_string(), "本人確認書類".to_string()],
            face_img_required: true,
            lesson: false,
            certification: CertificationPolicy {
                certification_type: RenewalMode::Everyone,
                temporary_deadline: true,
                shipped_days: 14,
                prefix: "MNP".to_string(),
                license_expiration_years: Some(2),
            },
            renew_text: RenewalMode::RequestOnly,
            renew_text_inclusion: Some(false),
            renew_lesson: RenewalMode::None,
            renew_lesson_inclusion: None,
            revision_law_information: true,
            fees: FeeSchedule {
                exam: Some(7700),
                student: Some(5500),
                group: Some(6600),
                certification: Some(1500),
                renewal: Some(3000),
                renew_text: Some(2500),
                ..FeeSchedule::default()
            },
            bank_account_id: pick_account(bank_accounts, rng),
            exam_url: Some("https://www.jitsumu-up.jp/com_contents/mynumber/".to_string()),
            memo: Some("３級はマイナンバー制度の基本的な理解度を測ります。".to_string()),
            audit: fixture_stamp(now),
        },
    ];

    Ok(exams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_bank_accounts_is_a_precondition_failure() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = exam_fixtures(&[], OffsetDateTime::now_utc(), &mut rng);
        assert!(matches!(result, Err(SeedError::MissingParents(Partition::BankAccount))));
    }

    #[test]
    fn test_every_exam_links_to_a_supplied_account() {
        let mut rng = StdRng::seed_from_u64(11);
        let accounts: Vec<RecordId> = (0..3).map(|_| RecordId::new()).collect();

        let exams = exam_fixtures(&accounts, OffsetDateTime::now_utc(), &mut rng).unwrap();
        assert_eq!(exams.len(), 4);
        for exam in &exams {
            assert!(accounts.contains(&exam.bank_account_id));
        }
    }

    #[test]
    fn test_absent_fees_are_omitted_from_the_record() {
        let mut rng = StdRng::seed_from_u64(2);
        let accounts = vec![RecordId::new()];
        let exams = exam_fixtures(&accounts, OffsetDateTime::now_utc(), &mut rng).unwrap();

        let claim = exams
            .iter()
            .find(|e| e.exam_name == "クレーム対応検定")
            .unwrap();
        let record = claim.to_record();
        assert_eq!(record.num_field("examFee"), Some(5500));
        assert_eq!(record.num_field("lessonFee"), Some(20000));
        assert!(record.get("studentFee").is_none());
        assert!(record.get("renewalFee").is_none());
        assert!(record.get("specialFee").is_none());
    }

    #[test]
    fn test_score_bands_encode_as_nested_maps() {
        let band = ScoreBand::new("知識問題", 70, 50);
        let value = band.to_value();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("display_name").and_then(FieldValue::as_str), Some("知識問題"));
        assert_eq!(map.get("perfectScore").and_then(FieldValue::as_u32), Some(70));
        assert_eq!(map.get("passingScore").and_then(FieldValue::as_u32), Some(50));
    }
}
