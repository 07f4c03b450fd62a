//! Audit-stamp fabrication.

use certstore::model::AuditStamp;
use rand::Rng;
use time::{Duration, OffsetDateTime};

/// Actor recorded on curated fixture records.
pub const SEED_ACTOR: &str = "system_seed_script";

/// Actor recorded on bulk-generated records.
pub const BATCH_ACTOR: &str = "system_batch";

/// Stamp for a record created "just now" by the seed script.
pub fn fixture_stamp(now: OffsetDateTime) -> AuditStamp {
    AuditStamp::new(SEED_ACTOR, now)
}

/// Stamp simulating a record created up to a year ago and touched once
/// since, by one of a few plausible actors.
pub fn backdated_stamp(username: &str, now: OffsetDateTime, rng: &mut impl Rng) -> AuditStamp {
    let created_on = now
        - Duration::days(rng.gen_range(1..=365))
        - Duration::minutes(rng.gen_range(0..24 * 60));

    let age_minutes = (now - created_on).whole_minutes().max(0);
    let updated_on = created_on + Duration::minutes(rng.gen_range(0..=age_minutes));

    let updated_by = match rng.gen_range(0..3) {
        0 => "system_update".to_string(),
        1 => "admin_portal".to_string(),
        _ => username.to_string(),
    };

    AuditStamp {
        created_by: BATCH_ACTOR.to_string(),
        created_on,
        updated_by,
        updated_on,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_backdated_stamp_ordering() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = OffsetDateTime::now_utc();

        for _ in 0..200 {
            let stamp = backdated_stamp("taro88", now, &mut rng);
            assert!(stamp.created_on <= stamp.updated_on);
            assert!(stamp.updated_on <= now);
            assert_eq!(stamp.created_by, BATCH_ACTOR);
        }
    }
}
