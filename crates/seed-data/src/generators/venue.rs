//! Curated exam venue fixtures.

use certstore::model::{AuditStamp, Partition, Record, RecordId};
use time::OffsetDateTime;

use crate::generators::audit::fixture_stamp;

/// Generated venue data ready for the batch writer.
#[derive(Debug, Clone)]
pub struct GeneratedVenue {
    pub id: RecordId,
    pub place_name: String,
    pub prefecture: String,
    pub city: String,
    pub address_line: String,
    pub building: String,
    pub postal_code: String,
    pub phone_number: String,
    pub place_capacity: u32,
    pub memo: Option<String>,
    pub place_url: Option<String>,
    pub audit: AuditStamp,
}

impl GeneratedVenue {
    pub fn to_record(&self) -> Record {
        let mut record = Record::with_id(Partition::Venue, self.id);
        record.set_str("placeName", self.place_name.clone());
        record.set_str("prefecture", self.prefecture.clone());
        record.set_str("city", self.city.clone());
        record.set_str("addressLine", self.address_line.clone());
        record.set_str("building", self.building.clone());
        record.set_str("postalCode", self.postal_code.clone());
        record.set_str("phoneNumber", self.phone_number.clone());
        record.set_num("placeCapacity", self.place_capacity);
        record.set_opt_str("memo", self.memo.clone());
        record.set_opt_str("placeUrl", self.place_url.clone());
        self.audit.write_to(&mut record);
        record
    }
}

struct VenueSeed {
    place_name: &'static str,
    prefecture: &'static str,
    city: &'static str,
    address_line: &'static str,
    building: &'static str,
    postal_code: &'static str,
    phone_number: &'static str,
    place_capacity: u32,
}

const VENUES: &[VenueSeed] = &[
    VenueSeed {
        place_name: "TKPガーデンシティPREMIUM東京駅",
        prefecture: "東京都",
        city: "中央区八重洲1-5-9",
        address_line: "八重洲MTビル 5F",
        building: "八重洲MTビル",
        postal_code: "103-0028",
        phone_number: "03-3527-9971",
        place_capacity: 120,
    },
    VenueSeed {
        place_name: "梅田スカイビル 会議室",
        prefecture: "大阪府",
        city: "大阪市北区大淀中1-1-88",
        address_line: "タワーウエスト 22F",
        building: "梅田スカイビル",
        postal_code: "531-6023",
        phone_number: "06-6440-3901",
        place_capacity: 250,
    },
    VenueSeed {
        place_name: "TKP札幌駅カンファレンスセンター",
        prefecture: "北海道",
        city: "札幌市北区北7条西2-9",
        address_line: "ベルヴュオフィス札幌 2F/3F",
        building: "ベルヴュオフィス札幌",
        postal_code: "060-0807",
        phone_number: "011-700-2121",
        place_capacity: 80,
    },
    VenueSeed {
        place_name: "JR博多シティ 会議室",
        prefecture: "福岡県",
        city: "福岡市博多区博多駅中央街1-1",
        address_line: "JR博多シティ 10F",
        building: "JR博多シティ",
        postal_code: "812-0012",
        phone_number: "092-431-1381",
        place_capacity: 150,
    },
    VenueSeed {
        place_name: "名古屋コンベンションホール",
        prefecture: "愛知県",
        city: "名古屋市中村区平池町4-60-12",
        address_line: "グローバルゲート 3F",
        building: "グローバルゲート",
        postal_code: "453-6103",
        phone_number: "052-589-8000",
        place_capacity: 300,
    },
    VenueSeed {
        place_name: "パシフィコ横浜 会議センター",
        prefecture: "神奈川県",
        city: "横浜市西区みなとみらい1-1-1",
        address_line: "会議センター 3F",
        building: "パシフィコ横浜",
        postal_code: "220-0012",
        phone_number: "045-221-2155",
        place_capacity: 200,
    },
    VenueSeed {
        place_name: "仙台AER 展望テラス",
        prefecture: "宮城県",
        city: "仙台市青葉区中央1-3-1",
        address_line: "AER 31F",
        building: "AERビル",
        postal_code: "980-6131",
        phone_number: "022-724-1111",
        place_capacity: 75,
    },
    VenueSeed {
        place_name: "広島コンベンションホール",
        prefecture: "広島県",
        city: "広島市東区二葉の里3-5-4",
        address_line: "広テレビル 1F",
        building: "広島テレビ・ビッグフロント広島",
        postal_code: "732-0057",
        phone_number: "082-261-3311",
        place_capacity: 180,
    },
    VenueSeed {
        place_name: "神戸国際会館セミナーハウス",
        prefecture: "兵庫県",
        city: "神戸市中央区御幸通8-1-6",
        address_line: "セミナーハウス 8F",
        building: "神戸国際会館",
        postal_code: "651-0087",
        phone_number: "078-231-8161",
        place_capacity: 60,
    },
    VenueSeed {
        place_name: "沖縄コンベンションセンター",
        prefecture: "沖縄県",
        city: "宜野湾市真志喜4-3-1",
        address_line: "会議棟A",
        building: "沖縄コンベンションセンター",
        postal_code: "901-2224",
        phone_number: "098-898-3000",
        place_capacity: 220,
    },
];

/// Returns the curated list of ten venues, stamped at `now`.
pub fn venue_fixtures(now: OffsetDateTime) -> Vec<GeneratedVenue> {
    VENUES
        .iter()
        .map(|seed| GeneratedVenue {
            id: RecordId::new(),
            place_name: seed.place_name.to_string(),
            prefecture: seed.prefecture.to_string(),
            city: seed.city.to_string(),
            address_line: seed.address_line.to_string(),
            building: seed.building.to_string(),
            postal_code: seed.postal_code.to_string(),
            phone_number: seed.phone_number.to_string(),
            place_capacity: seed.place_capacity,
            memo: None,
            place_url: None,
            audit: fixture_stamp(now),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ten_venues_with_unique_ids() {
        let venues = venue_fixtures(OffsetDateTime::now_utc());
        assert_eq!(venues.len(), 10);

        let ids: HashSet<_> = venues.iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_records_carry_capacity_and_prefecture() {
        let venues = venue_fixtures(OffsetDateTime::now_utc());
        for venue in venues {
            let record = venue.to_record();
            assert_eq!(record.partition(), Partition::Venue);
            assert!(record.num_field("placeCapacity").unwrap_or(0) > 0);
            assert!(!record.str_field("prefecture").unwrap_or("").is_empty());
        }
    }
}
