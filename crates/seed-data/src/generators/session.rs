//! Exam session ("EXAM_HOLD") generation.
//!
//! A session takes a point-in-time copy of its parent exam's policy and
//! fee fields; later edits to the exam do not propagate. Dates are derived
//! from a generated exam date so the whole ladder stays chronologically
//! consistent.

use std::collections::{BTreeMap, BTreeSet};

use certstore::model::{format_date, Partition, Record, RecordId};
use certstore::value::FieldValue;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::errors::SeedError;
use crate::generators::audit::fixture_stamp;

/// Exam attributes a session inherits verbatim at creation time.
const INHERITED_EXAM_FIELDS: &[&str] = &[
    "timeRequired",
    "score",
    "scoreComment",
    "examItems",
    "faceImgRequired",
    "lesson",
    "certificationType",
    "certificationTemporaryDeadline",
    "certificationShipped",
    "certificationPrefix",
    "licenseExpirationDate",
    "renewText",
    "renewTextInclusion",
    "renewLesson",
    "renewLessonInclusion",
    "revisionLawInformation",
    "examFee",
    "studentFee",
    "groupFee",
    "lessonFee",
    "certificationFee",
    "renewalFee",
    "renewTextFee",
    "renewLessonFee",
    "specialFee",
];

/// Days between the exam date and the close of the application window.
pub const APPLICATION_CLOSE_DAYS: i64 = 10;
/// Days between the exam date and the opening of the application window.
pub const APPLICATION_OPEN_DAYS: i64 = 40;
/// Days after the exam date that results post.
pub const RESULT_DAYS: i64 = 21;
/// Days after the result date that the certificate window closes.
pub const CERTIFICATE_WINDOW_DAYS: i64 = 14;
/// Days before the exam date that downloads open.
pub const DOWNLOAD_LEAD_DAYS: i64 = 7;

/// Seats allocated to one venue for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueAllocation {
    pub place_id: RecordId,
    pub capacity: u32,
}

impl VenueAllocation {
    pub fn to_value(&self) -> FieldValue {
        FieldValue::M(BTreeMap::from([
            ("placeId".to_string(), FieldValue::s(self.place_id.to_string())),
            ("capacity".to_string(), FieldValue::n(self.capacity)),
        ]))
    }
}

/// Configuration for session generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionGenConfig {
    /// Minimum and maximum days from today to the first exam date.
    pub lead_time_days: (i64, i64),
    /// Extra days added per generated session so dates spread out.
    pub stagger_days: i64,
    /// Venue capacity range, in units of ten seats.
    pub capacity_units: (u32, u32),
    /// Maximum venues per session.
    pub max_venues: usize,
}

impl Default for SessionGenConfig {
    fn default() -> Self {
        Self {
            lead_time_days: (45, 120),
            stagger_days: 10,
            capacity_units: (5, 20),
            max_venues: 2,
        }
    }
}

/// Generates exam sessions from existing exam and venue records.
pub struct SessionGenerator {
    config: SessionGenConfig,
}

impl SessionGenerator {
    pub fn new() -> Self {
        Self {
            config: SessionGenConfig::default(),
        }
    }

    pub fn with_config(config: SessionGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` sessions, each over one random exam and 1–2
    /// random venues. Empty parent sets are precondition failures.
    pub fn generate_batch(
        &self,
        count: usize,
        exams: &[Record],
        venues: &[Record],
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<Record>, SeedError> {
        if exams.is_empty() {
            return Err(SeedError::MissingParents(Partition::Exam));
        }
        if venues.is_empty() {
            return Err(SeedError::MissingParents(Partition::Venue));
        }

        (0..count)
            .map(|index| self.generate(index, exams, venues, now, rng))
            .collect()
    }

    fn generate(
        &self,
        index: usize,
        exams: &[Record],
        venues: &[Record],
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Result<Record, SeedError> {
        let exam = &exams[rng.gen_range(0..exams.len())];

        let venue_count = rng.gen_range(1..=self.config.max_venues.min(venues.len()));
        let chosen: Vec<&Record> = rand::seq::index::sample(rng, venues.len(), venue_count)
            .iter()
            .map(|i| &venues[i])
            .collect();

        let (min_units, max_units) = self.config.capacity_units;
        let allocations: Vec<VenueAllocation> = chosen
            .iter()
            .map(|venue| VenueAllocation {
                place_id: venue.id(),
                capacity: rng.gen_range(min_units..=max_units) * 10,
            })
            .collect();
        let prefectures: BTreeSet<&str> = chosen
            .iter()
            .filter_map(|venue| venue.str_field("prefecture"))
            .collect();

        let (min_lead, max_lead) = self.config.lead_time_days;
        let exam_hold_date = now.date()
            + Duration::days(
                rng.gen_range(min_lead..=max_lead) + index as i64 * self.config.stagger_days,
            );
        let application_to = exam_hold_date - Duration::days(APPLICATION_CLOSE_DAYS);
        let application_from = exam_hold_date - Duration::days(APPLICATION_OPEN_DAYS);
        let result_day = exam_hold_date + Duration::days(RESULT_DAYS);
        let certification_to = result_day + Duration::days(CERTIFICATE_WINDOW_DAYS);
        let download_permission = exam_hold_date - Duration::days(DOWNLOAD_LEAD_DAYS);

        let start_hour = rng.gen_range(10..=13);
        let start_minutes = start_hour * 60;

        let mut record = Record::new(Partition::ExamSession);
        record.set_str("examId", exam.id().to_string());
        record.set_str("examName", exam.require_str("examName")?.to_string());
        record.set_num("examHoldNo", index as u32 + 1);
        record.set_str(
            "bankAccountId",
            exam.require_str("bankAccountId")?.to_string(),
        );

        copy_inherited_fields(exam, &mut record);

        record.set_list(
            "prefectures",
            prefectures.into_iter().map(FieldValue::s).collect(),
        );
        record.set_list(
            "examHoldPlace",
            allocations.iter().map(VenueAllocation::to_value).collect(),
        );

        record.set_str("examHoldDate", format_date(exam_hold_date));
        record.set_str("applicationPeriodFrom", format_date(application_from));
        record.set_str("applicationPeriodTo", format_date(application_to));
        record.set_str("resultDay", format_date(result_day));
        record.set_str("downloadPermissionDate", format_date(download_permission));
        record.set_str("certificationPeriodTo", format_date(certification_to));
        record.set_str("startTime", format_hhmm(start_minutes));
        record.set_str("openTime", format_hhmm(start_minutes - 30));
        record.set_str("lessonStartTime", format_hhmm(start_minutes - 60));
        record.set_str("lessonOpenTime", format_hhmm(start_minutes - 90));

        record.set_bool("examHoldActivation", rng.r#gen::<bool>());
        record.set_bool("renewal", false);
        record.set_bool("renewalReserve", false);
        record.set_list(
            "documentsRequired",
            vec![FieldValue::s("写真付き身分証明書")],
        );
        record.set_list(
            "cautions",
            vec![
                FieldValue::s("会場内での飲食はご遠慮ください。"),
                FieldValue::s("試験開始後の入室は認められません。"),
            ],
        );
        record.set_str(
            "memo",
            format!(
                "第{}回 {} の試験日程です。",
                index + 1,
                exam.str_field("examName").unwrap_or("")
            ),
        );

        fixture_stamp(now).write_to(&mut record);

        Ok(record)
    }
}

impl Default for SessionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the inherited exam attributes that are present, then fills the
/// policy fields a complete session record always carries.
fn copy_inherited_fields(exam: &Record, session: &mut Record) {
    for name in INHERITED_EXAM_FIELDS {
        if let Some(value) = exam.get(name) {
            session.set(name, value.clone());
        }
    }

    if session.get("timeRequired").is_none() {
        session.set_num("timeRequired", 60);
    }
    if session.get("faceImgRequired").is_none() {
        session.set_bool("faceImgRequired", false);
    }
    if session.get("lesson").is_none() {
        session.set_bool("lesson", false);
    }
    if session.get("certificationType").is_none() {
        session.set_str("certificationType", "none");
    }
    if session.get("certificationShipped").is_none() {
        session.set_num("certificationShipped", 14);
    }
    if session.get("renewText").is_none() {
        session.set_str("renewText", "none");
    }
    if session.get("renewLesson").is_none() {
        session.set_str("renewLesson", "none");
    }
    if session.get("revisionLawInformation").is_none() {
        session.set_bool("revisionLawInformation", false);
    }
}

fn format_hhmm(total_minutes: u32) -> String {
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}
