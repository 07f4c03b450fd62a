//! Seeding pipelines: read parents, generate, write in batches.
//!
//! Each pipeline is one linear pass for a single entity type. A pipeline
//! whose entity depends on parents fetches them first and aborts before
//! generating anything when a required set is empty — partial upstream
//! data never turns into orphaned references downstream.

use certstore::model::{Partition, Record, RecordId};
use certstore::{fetch_by_partition, BatchWriter, StoreBackend, WriteReport};
use rand::Rng;
use time::OffsetDateTime;
use tracing::info;

use crate::errors::SeedError;
use crate::generators::{
    bank_account_fixtures, exam_fixtures, venue_fixtures, ApplicationGenerator,
    CertificationGenerator, PaymentGenerator, SessionGenerator, StudentGenerator,
};

async fn write_all<S: StoreBackend + ?Sized>(
    store: &S,
    records: &[Record],
    pause_secs: u64,
) -> WriteReport {
    BatchWriter::new(store)
        .with_pause_secs(pause_secs)
        .put_all(records)
        .await
}

pub async fn seed_students<S: StoreBackend + ?Sized>(
    store: &S,
    count: usize,
    pause_secs: u64,
    rng: &mut impl Rng,
) -> Result<WriteReport, SeedError> {
    info!("generating {count} student records");
    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = StudentGenerator::new()
        .generate_batch(count, now, rng)
        .iter()
        .map(|student| student.to_record())
        .collect();

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_venues<S: StoreBackend + ?Sized>(
    store: &S,
    pause_secs: u64,
) -> Result<WriteReport, SeedError> {
    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = venue_fixtures(now)
        .iter()
        .map(|venue| venue.to_record())
        .collect();
    info!("generated {} venue records", records.len());

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_bank_accounts<S: StoreBackend + ?Sized>(
    store: &S,
    pause_secs: u64,
) -> Result<WriteReport, SeedError> {
    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = bank_account_fixtures(now)
        .iter()
        .map(|account| account.to_record())
        .collect();
    info!("generated {} bank account records", records.len());

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_exams<S: StoreBackend + ?Sized>(
    store: &S,
    pause_secs: u64,
    rng: &mut impl Rng,
) -> Result<WriteReport, SeedError> {
    let accounts = fetch_by_partition(store, Partition::BankAccount).await?;
    if accounts.is_empty() {
        return Err(SeedError::MissingParents(Partition::BankAccount));
    }
    let account_ids: Vec<RecordId> = accounts.iter().map(Record::id).collect();

    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = exam_fixtures(&account_ids, now, rng)?
        .iter()
        .map(|exam| exam.to_record())
        .collect();
    info!("generated {} exam records", records.len());

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_sessions<S: StoreBackend + ?Sized>(
    store: &S,
    count: usize,
    pause_secs: u64,
    rng: &mut impl Rng,
) -> Result<WriteReport, SeedError> {
    let exams = fetch_by_partition(store, Partition::Exam).await?;
    let venues = fetch_by_partition(store, Partition::Venue).await?;

    let now = OffsetDateTime::now_utc();
    let records = SessionGenerator::new().generate_batch(count, &exams, &venues, now, rng)?;
    info!("generated {} session records", records.len());

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_applications<S: StoreBackend + ?Sized>(
    store: &S,
    pause_secs: u64,
    rng: &mut impl Rng,
) -> Result<WriteReport, SeedError> {
    let students = fetch_by_partition(store, Partition::Student).await?;
    let sessions = fetch_by_partition(store, Partition::ExamSession).await?;

    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = ApplicationGenerator::new()
        .generate_batch(&students, &sessions, now, rng)?
        .iter()
        .map(|application| application.to_record())
        .collect();
    info!("generated {} application records", records.len());

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_payments<S: StoreBackend + ?Sized>(
    store: &S,
    pause_secs: u64,
) -> Result<WriteReport, SeedError> {
    let applications = fetch_by_partition(store, Partition::Application).await?;

    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = PaymentGenerator::new()
        .generate_batch(&applications, now)?
        .iter()
        .map(|payment| payment.to_record())
        .collect();
    info!("generated {} payment records", records.len());

    Ok(write_all(store, &records, pause_secs).await)
}

pub async fn seed_certifications<S: StoreBackend + ?Sized>(
    store: &S,
    pause_secs: u64,
    rng: &mut impl Rng,
) -> Result<WriteReport, SeedError> {
    let applications = fetch_by_partition(store, Partition::Application).await?;

    let now = OffsetDateTime::now_utc();
    let records: Vec<Record> = CertificationGenerator::new()
        .generate_batch(&applications, now, rng)?
        .iter()
        .map(|certification| certification.to_record())
        .collect();
    info!(
        "generated {} certification records from {} applications",
        records.len(),
        applications.len()
    );

    Ok(write_all(store, &records, pause_secs).await)
}
