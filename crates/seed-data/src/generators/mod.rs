//! Fixture generators, one module per entity type.
//!
//! Generators are pure: they take a random source plus any parent records
//! and return in-memory records ready for the batch writer. A generator
//! whose entity references a parent requires a non-empty parent set and
//! fails otherwise — an orphaned reference is never emitted.

pub mod application;
pub mod audit;
pub mod bank;
pub mod certification;
pub mod exam;
pub mod payment;
pub mod session;
pub mod student;
pub mod venue;

pub use application::{ApplicationGenerator, GeneratedApplication, PaymentMethod, PaymentStatus};
pub use bank::{bank_account_fixtures, GeneratedBankAccount};
pub use certification::{CertificationGenerator, GeneratedCertification};
pub use exam::{exam_fixtures, CertificationPolicy, FeeSchedule, GeneratedExam, RenewalMode, ScoreBand};
pub use payment::{GeneratedPayment, PaymentGenerator};
pub use session::{SessionGenConfig, SessionGenerator, VenueAllocation};
pub use student::{GeneratedStudent, StudentGenConfig, StudentGenerator};
pub use venue::{venue_fixtures, GeneratedVenue};
