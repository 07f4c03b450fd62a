//! End-to-end seeding against the in-memory store.

use std::collections::HashSet;

use certstore::model::{Partition, Record};
use certstore::{fetch_by_partition, MemoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use seed_data::errors::SeedError;
use seed_data::seeder;

#[tokio::test]
async fn test_full_dependency_chain() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(2026);

    seeder::seed_bank_accounts(&store, 0).await.unwrap();
    seeder::seed_venues(&store, 0).await.unwrap();

    let exam_report = seeder::seed_exams(&store, 0, &mut rng).await.unwrap();
    assert_eq!(exam_report.succeeded, 4);

    // Every exam references one of the seeded bank accounts.
    let accounts = fetch_by_partition(&store, Partition::BankAccount)
        .await
        .unwrap();
    let account_ids: HashSet<String> = accounts.iter().map(|a| a.id().to_string()).collect();
    assert_eq!(account_ids.len(), 5);

    let exams = fetch_by_partition(&store, Partition::Exam).await.unwrap();
    for exam in &exams {
        let linked = exam.str_field("bankAccountId").unwrap();
        assert!(account_ids.contains(linked));
    }

    let session_report = seeder::seed_sessions(&store, 5, 0, &mut rng).await.unwrap();
    assert_eq!(session_report.succeeded, 5);

    let student_report = seeder::seed_students(&store, 30, 0, &mut rng).await.unwrap();
    assert_eq!(student_report.succeeded, 30);

    let application_report = seeder::seed_applications(&store, 0, &mut rng).await.unwrap();
    assert_eq!(application_report.succeeded, 30);

    // Application totals match the snapshot of their session's fees.
    let sessions = fetch_by_partition(&store, Partition::ExamSession)
        .await
        .unwrap();
    let applications = fetch_by_partition(&store, Partition::Application)
        .await
        .unwrap();
    for application in &applications {
        let session_id = application.str_field("examHoldId").unwrap();
        let session = sessions
            .iter()
            .find(|s| s.id().to_string() == session_id)
            .unwrap();

        let expected = session.num_field("examFee").unwrap_or(0)
            + session.num_field("lessonFee").unwrap_or(0)
            + session.num_field("certificationFee").unwrap_or(0);
        assert_eq!(application.num_field("totalFee"), Some(expected));
    }

    let payment_report = seeder::seed_payments(&store, 0).await.unwrap();
    assert_eq!(payment_report.succeeded, 30);

    seeder::seed_certifications(&store, 0, &mut rng).await.unwrap();

    // Exactly the completed applications got a certification, each one a
    // distinct reference.
    let completed: HashSet<String> = applications
        .iter()
        .filter(|a| a.str_field("paymentStatus") == Some("completed"))
        .map(|a| a.id().to_string())
        .collect();

    let certifications = fetch_by_partition(&store, Partition::Certification)
        .await
        .unwrap();
    let referenced: HashSet<String> = certifications
        .iter()
        .map(|c| c.str_field("applicationId").unwrap().to_string())
        .collect();

    assert_eq!(certifications.len(), completed.len());
    assert_eq!(referenced, completed);
}

#[tokio::test]
async fn test_exam_seeding_aborts_without_bank_accounts() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(1);

    let result = seeder::seed_exams(&store, 0, &mut rng).await;
    assert!(matches!(
        result,
        Err(SeedError::MissingParents(Partition::BankAccount))
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_application_seeding_aborts_without_sessions() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(2);

    seeder::seed_students(&store, 5, 0, &mut rng).await.unwrap();
    let before = store.len();

    let result = seeder::seed_applications(&store, 0, &mut rng).await;
    assert!(matches!(
        result,
        Err(SeedError::MissingParents(Partition::ExamSession))
    ));
    assert_eq!(store.len(), before);
}

#[tokio::test]
async fn test_student_records_share_one_key_set() {
    let store = MemoryStore::new();
    let mut rng = StdRng::seed_from_u64(3);

    seeder::seed_students(&store, 10, 0, &mut rng).await.unwrap();

    let students = fetch_by_partition(&store, Partition::Student).await.unwrap();
    let key_sets: HashSet<Vec<String>> = students
        .iter()
        .map(|record: &Record| record.fields.keys().cloned().collect())
        .collect();
    assert_eq!(key_sets.len(), 1);
}
