//! Synthetic data seeding for the exam-registry table.
//!
//! Each binary in this crate seeds or purges one entity type. Entities
//! form a dependency chain expressed only through the shared table:
//!
//! - `STUDENT`, `EXAM_PLACE`, `BANK_ACCOUNT` — independent
//! - `EXAM` — references a `BANK_ACCOUNT`
//! - `EXAM_HOLD` — references an `EXAM` and 1–2 `EXAM_PLACE`s
//! - `APPLICATION` — references a `STUDENT` and an `EXAM_HOLD`
//! - `PAYMENT`, `CERTIFICATION` — reference an `APPLICATION`
//!
//! A seeder for a dependent entity reads its parents back from the table,
//! so the binaries must run in dependency order.

pub mod errors;
pub mod generators;
pub mod prompt;
pub mod seeder;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::errors::SeedError;
    pub use crate::generators::{
        bank_account_fixtures, exam_fixtures, venue_fixtures, ApplicationGenerator,
        CertificationGenerator, PaymentGenerator, SessionGenerator, StudentGenerator,
    };
    pub use crate::prompt::PurgeScope;
    pub use crate::seeder::{
        seed_applications, seed_bank_accounts, seed_certifications, seed_exams, seed_payments,
        seed_sessions, seed_students, seed_venues,
    };
}
