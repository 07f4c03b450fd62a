//! Student generation with randomized personal data.

use certstore::model::{format_date, AuditStamp, Partition, Record, RecordId};
use fake::faker::internet::en::{FreeEmail, Username};
use fake::Fake;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::generators::audit::backdated_stamp;

/// Every non-key attribute a student record carries. Generated records
/// always contain the full set, with empty strings for unset values, so
/// any batch shares one identical key set.
pub const STUDENT_FIELDS: &[&str] = &[
    "addressLine",
    "birthday",
    "city",
    "createdBy",
    "createdOn",
    "email",
    "faxNumber",
    "firstName",
    "firstNameKana",
    "gender",
    "lastName",
    "lastNameKana",
    "mansionBuilding",
    "noticeName",
    "noticeStudent",
    "occupation",
    "online",
    "organization",
    "organizationAddressLine",
    "organizationCity",
    "organizationMansionBuilding",
    "organizationPN",
    "organizationPostalCode",
    "organizationPrefecture",
    "phoneNumber1",
    "phoneNumber2",
    "postalCode",
    "prefecture",
    "resignation",
    "sendingAddress",
    "updatedBy",
    "updatedOn",
    "username",
];

const FAMILY_NAMES: &[(&str, &str)] = &[
    ("佐藤", "サトウ"),
    ("鈴木", "スズキ"),
    ("高橋", "タカハシ"),
    ("田中", "タナカ"),
    ("伊藤", "イトウ"),
    ("渡辺", "ワタナベ"),
    ("山本", "ヤマモト"),
    ("中村", "ナカムラ"),
    ("小林", "コバヤシ"),
    ("加藤", "カトウ"),
    ("吉田", "ヨシダ"),
    ("山田", "ヤマダ"),
    ("佐々木", "ササキ"),
    ("松本", "マツモト"),
    ("井上", "イノウエ"),
    ("木村", "キムラ"),
    ("林", "ハヤシ"),
    ("斎藤", "サイトウ"),
    ("清水", "シミズ"),
    ("山口", "ヤマグチ"),
];

const GIVEN_NAMES: &[(&str, &str)] = &[
    ("太郎", "タロウ"),
    ("花子", "ハナコ"),
    ("健一", "ケンイチ"),
    ("美咲", "ミサキ"),
    ("大輔", "ダイスケ"),
    ("陽子", "ヨウコ"),
    ("直樹", "ナオキ"),
    ("恵美", "エミ"),
    ("翔太", "ショウタ"),
    ("さくら", "サクラ"),
    ("拓也", "タクヤ"),
    ("由美子", "ユミコ"),
    ("誠", "マコト"),
    ("愛", "アイ"),
    ("裕子", "ユウコ"),
    ("亮", "リョウ"),
    ("千尋", "チヒロ"),
    ("浩二", "コウジ"),
    ("舞", "マイ"),
    ("和也", "カズヤ"),
];

const PREFECTURES: &[&str] = &[
    "東京都",
    "大阪府",
    "北海道",
    "福岡県",
    "愛知県",
    "神奈川県",
    "宮城県",
    "広島県",
    "兵庫県",
    "沖縄県",
    "京都府",
    "埼玉県",
    "千葉県",
    "静岡県",
    "新潟県",
];

const CITIES: &[&str] = &[
    "横浜市",
    "川崎市",
    "さいたま市",
    "松戸市",
    "船橋市",
    "藤沢市",
    "名古屋市",
    "神戸市",
    "京都市",
    "福岡市",
];

const TOWNS: &[&str] = &[
    "青葉台",
    "本町",
    "栄町",
    "旭町",
    "寿町",
    "大手町",
    "桜木町",
    "若葉町",
    "緑町",
    "末広町",
];

const BUILDINGS: &[&str] = &[
    "コーポ青葉",
    "メゾン桜",
    "グランドハイツ本町",
    "サンシャインマンション",
    "レジデンス平和",
    "ハイツひまわり",
    "ヴィラ富士見",
    "パークサイド旭",
];

const OCCUPATIONS: &[&str] = &["Engineer", "Teacher", "Doctor", "Office Worker", "Student"];

const COMPANIES: &[&str] = &[
    "株式会社山田製作所",
    "合同会社みらい企画",
    "株式会社東雲商事",
    "有限会社田島工務店",
    "株式会社ネクストステップ",
    "株式会社青空物流",
    "株式会社ひかり出版",
    "株式会社はまかぜ設計",
];

const UNIVERSITIES: &[&str] = &["北斗大学", "青葉大学", "緑川大学", "白浜大学", "桜丘大学"];

/// Where exam documents are mailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendingAddress {
    Home,
    Work,
}

impl SendingAddress {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendingAddress::Home => "home",
            SendingAddress::Work => "work",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Workplace address block, filled when documents go to the workplace.
#[derive(Debug, Clone)]
pub struct WorkplaceAddress {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub address_line: String,
    pub building: Option<String>,
    pub phone_number: String,
}

/// Guardian/notice contact pair; both fields are set together.
#[derive(Debug, Clone)]
pub struct NoticeContact {
    pub name: String,
    pub student_name: String,
}

/// Generated student data ready for the batch writer.
#[derive(Debug, Clone)]
pub struct GeneratedStudent {
    pub id: RecordId,
    pub online: bool,
    pub last_name: String,
    pub first_name: String,
    pub last_name_kana: String,
    pub first_name_kana: String,
    pub birthday: time::Date,
    pub gender: Gender,
    pub phone_number1: String,
    pub phone_number2: Option<String>,
    pub fax_number: Option<String>,
    pub email: String,
    pub occupation: Option<String>,
    pub organization: Option<String>,
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub address_line: String,
    pub mansion_building: Option<String>,
    pub sending_address: SendingAddress,
    pub workplace: Option<WorkplaceAddress>,
    pub notice: Option<NoticeContact>,
    pub resignation: Option<String>,
    pub username: String,
    pub audit: AuditStamp,
}

impl GeneratedStudent {
    /// Builds the store record, writing every declared field so all
    /// student records share the same key set.
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::Student, self.id);

        record.set_bool("online", self.online);
        record.set_str("lastName", self.last_name.clone());
        record.set_str("firstName", self.first_name.clone());
        record.set_str("lastNameKana", self.last_name_kana.clone());
        record.set_str("firstNameKana", self.first_name_kana.clone());
        record.set_str("birthday", format_date(self.birthday));
        record.set_str("gender", self.gender.as_str());
        record.set_str("phoneNumber1", self.phone_number1.clone());
        record.set_str("phoneNumber2", self.phone_number2.clone().unwrap_or_default());
        record.set_str("faxNumber", self.fax_number.clone().unwrap_or_default());
        record.set_str("email", self.email.clone());
        record.set_str("occupation", self.occupation.clone().unwrap_or_default());
        record.set_str("organization", self.organization.clone().unwrap_or_default());
        record.set_str("postalCode", self.postal_code.clone());
        record.set_str("prefecture", self.prefecture.clone());
        record.set_str("city", self.city.clone());
        record.set_str("addressLine", self.address_line.clone());
        record.set_str(
            "mansionBuilding",
            self.mansion_building.clone().unwrap_or_default(),
        );
        record.set_str("sendingAddress", self.sending_address.as_str());

        let workplace = self.workplace.as_ref();
        record.set_str(
            "organizationPostalCode",
            workplace.map(|w| w.postal_code.clone()).unwrap_or_default(),
        );
        record.set_str(
            "organizationPrefecture",
            workplace.map(|w| w.prefecture.clone()).unwrap_or_default(),
        );
        record.set_str(
            "organizationCity",
            workplace.map(|w| w.city.clone()).unwrap_or_default(),
        );
        record.set_str(
            "organizationAddressLine",
            workplace.map(|w| w.address_line.clone()).unwrap_or_default(),
        );
        record.set_str(
            "organizationMansionBuilding",
            workplace
                .and_then(|w| w.building.clone())
                .unwrap_or_default(),
        );
        record.set_str(
            "organizationPN",
            workplace.map(|w| w.phone_number.clone()).unwrap_or_default(),
        );

        let notice = self.notice.as_ref();
        record.set_str(
            "noticeName",
            notice.map(|n| n.name.clone()).unwrap_or_default(),
        );
        record.set_str(
            "noticeStudent",
            notice.map(|n| n.student_name.clone()).unwrap_or_default(),
        );

        record.set_str("resignation", self.resignation.clone().unwrap_or_default());
        record.set_str("username", self.username.clone());
        self.audit.write_to(&mut record);

        record
    }
}

/// Configuration for student generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGenConfig {
    /// Probability of a second phone number.
    pub phone2_rate: f64,
    /// Probability that a student with an organization also carries the
    /// workplace address block even when documents go home.
    pub workplace_rate: f64,
    /// Probability of a guardian/notice contact.
    pub notice_rate: f64,
    /// Mean age in years.
    pub age_mean: f64,
    /// Standard deviation of age.
    pub age_std: f64,
}

impl Default for StudentGenConfig {
    fn default() -> Self {
        Self {
            phone2_rate: 0.5,
            workplace_rate: 0.5,
            notice_rate: 0.33,
            age_mean: 40.0,
            age_std: 12.0,
        }
    }
}

/// Generates realistic student records.
pub struct StudentGenerator {
    config: StudentGenConfig,
}

impl StudentGenerator {
    pub fn new() -> Self {
        Self {
            config: StudentGenConfig::default(),
        }
    }

    pub fn with_config(config: StudentGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single student.
    pub fn generate(&self, now: OffsetDateTime, rng: &mut impl Rng) -> GeneratedStudent {
        let (last_name, last_name_kana) = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
        let (first_name, first_name_kana) = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];

        let gender = match rng.gen_range(0..3) {
            0 => Gender::Male,
            1 => Gender::Female,
            _ => Gender::Other,
        };

        let occupation = if rng.gen_range(0..6) == 0 {
            None
        } else {
            Some(OCCUPATIONS[rng.gen_range(0..OCCUPATIONS.len())].to_string())
        };
        let organization = match occupation.as_deref() {
            Some("Student") => Some(UNIVERSITIES[rng.gen_range(0..UNIVERSITIES.len())].to_string()),
            Some(_) if rng.r#gen::<bool>() => {
                Some(COMPANIES[rng.gen_range(0..COMPANIES.len())].to_string())
            }
            _ => None,
        };

        let sending_address = if rng.r#gen::<bool>() {
            SendingAddress::Home
        } else {
            SendingAddress::Work
        };
        let needs_workplace = sending_address == SendingAddress::Work
            || (organization.is_some() && rng.r#gen::<f64>() < self.config.workplace_rate);
        let workplace = needs_workplace.then(|| self.generate_workplace(rng));

        let notice = (rng.r#gen::<f64>() < self.config.notice_rate).then(|| NoticeContact {
            name: full_name(rng),
            student_name: format!("{first_name} {last_name}"),
        });

        let email: String = FreeEmail().fake_with_rng(rng);
        let username: String = Username().fake_with_rng(rng);
        let audit = backdated_stamp(&username, now, rng);

        GeneratedStudent {
            id: RecordId::new(),
            online: rng.r#gen::<bool>(),
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            last_name_kana: last_name_kana.to_string(),
            first_name_kana: first_name_kana.to_string(),
            birthday: self.generate_birthday(now, rng),
            gender,
            phone_number1: mobile_phone(rng),
            phone_number2: (rng.r#gen::<f64>() < self.config.phone2_rate)
                .then(|| landline_phone(rng)),
            fax_number: None,
            email,
            occupation,
            organization,
            postal_code: postal_code(rng),
            prefecture: PREFECTURES[rng.gen_range(0..PREFECTURES.len())].to_string(),
            city: city(rng),
            address_line: address_line(rng),
            mansion_building: rng
                .r#gen::<bool>()
                .then(|| BUILDINGS[rng.gen_range(0..BUILDINGS.len())].to_string()),
            sending_address,
            workplace,
            notice,
            resignation: None,
            username,
            audit,
        }
    }

    /// Generates multiple students.
    pub fn generate_batch(
        &self,
        count: usize,
        now: OffsetDateTime,
        rng: &mut impl Rng,
    ) -> Vec<GeneratedStudent> {
        (0..count).map(|_| self.generate(now, rng)).collect()
    }

    fn generate_birthday(&self, now: OffsetDateTime, rng: &mut impl Rng) -> time::Date {
        let normal = Normal::new(self.config.age_mean, self.config.age_std).unwrap();
        let age_years = normal.sample(rng).clamp(18.0, 65.0);
        let age_days = (age_years * 365.0) as i64 + rng.gen_range(0..365);
        now.date() - Duration::days(age_days)
    }

    fn generate_workplace(&self, rng: &mut impl Rng) -> WorkplaceAddress {
        WorkplaceAddress {
            postal_code: postal_code(rng),
            prefecture: PREFECTURES[rng.gen_range(0..PREFECTURES.len())].to_string(),
            city: city(rng),
            address_line: address_line(rng),
            building: rng
                .r#gen::<bool>()
                .then(|| BUILDINGS[rng.gen_range(0..BUILDINGS.len())].to_string()),
            phone_number: landline_phone(rng),
        }
    }
}

impl Default for StudentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn full_name(rng: &mut impl Rng) -> String {
    let (family, _) = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
    let (given, _) = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    format!("{family} {given}")
}

fn mobile_phone(rng: &mut impl Rng) -> String {
    let carrier = [7, 8, 9][rng.gen_range(0..3)];
    format!(
        "0{carrier}0-{}-{}",
        rng.gen_range(1000..=9999),
        rng.gen_range(1000..=9999)
    )
}

fn landline_phone(rng: &mut impl Rng) -> String {
    format!(
        "0{}-{}-{}",
        rng.gen_range(3..=9),
        rng.gen_range(1000..=9999),
        rng.gen_range(1000..=9999)
    )
}

fn postal_code(rng: &mut impl Rng) -> String {
    format!("{:03}-{:04}", rng.gen_range(100..=999), rng.gen_range(0..=9999))
}

fn city(rng: &mut impl Rng) -> String {
    format!(
        "{}{}",
        CITIES[rng.gen_range(0..CITIES.len())],
        TOWNS[rng.gen_range(0..TOWNS.len())]
    )
}

fn address_line(rng: &mut impl Rng) -> String {
    format!(
        "{}-{}-{}",
        rng.gen_range(1..=5),
        rng.gen_range(1..=30),
        rng.gen_range(1..=20)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{BTreeSet, HashSet};

    #[test]
    fn test_every_record_carries_the_full_field_set() {
        let generator = StudentGenerator::new();
        let mut rng = StdRng::seed_from_u64(42);
        let now = OffsetDateTime::now_utc();

        let expected: BTreeSet<&str> = STUDENT_FIELDS.iter().copied().collect();
        for student in generator.generate_batch(50, now, &mut rng) {
            let record = student.to_record();
            let fields: BTreeSet<&str> = record.fields.keys().map(String::as_str).collect();
            assert_eq!(fields, expected);
        }
    }

    #[test]
    fn test_ids_are_pairwise_unique() {
        let generator = StudentGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let students = generator.generate_batch(100, OffsetDateTime::now_utc(), &mut rng);

        let ids: HashSet<_> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_workplace_block_is_all_or_nothing() {
        let generator = StudentGenerator::new();
        let mut rng = StdRng::seed_from_u64(9);
        let now = OffsetDateTime::now_utc();

        for student in generator.generate_batch(100, now, &mut rng) {
            if student.sending_address == SendingAddress::Work {
                assert!(student.workplace.is_some());
            }
            let record = student.to_record();
            let postal = record.str_field("organizationPostalCode").unwrap_or("");
            let phone = record.str_field("organizationPN").unwrap_or("");
            assert_eq!(postal.is_empty(), phone.is_empty());
        }
    }

    #[test]
    fn test_notice_fields_are_set_together() {
        let generator = StudentGenerator::new();
        let mut rng = StdRng::seed_from_u64(5);
        let now = OffsetDateTime::now_utc();

        for student in generator.generate_batch(100, now, &mut rng) {
            let record = student.to_record();
            let name = record.str_field("noticeName").unwrap_or("");
            let linked = record.str_field("noticeStudent").unwrap_or("");
            assert_eq!(name.is_empty(), linked.is_empty());
        }
    }

    #[test]
    fn test_birthdays_fall_in_the_adult_range() {
        let generator = StudentGenerator::new();
        let mut rng = StdRng::seed_from_u64(3);
        let now = OffsetDateTime::now_utc();

        for student in generator.generate_batch(100, now, &mut rng) {
            let age_days = (now.date() - student.birthday).whole_days();
            assert!(age_days >= 18 * 365);
            assert!(age_days <= 67 * 365);
        }
    }
}
