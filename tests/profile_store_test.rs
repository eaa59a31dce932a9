mod common;

use profiles_backend::errors::internal::StorageError;
use profiles_backend::stores::{ProfileRepository, ProfileStore};

#[tokio::test]
async fn test_insert_assigns_an_id_and_zeroed_counters() {
    let db = common::setup_test_db().await;
    let store = ProfileStore::new(db);

    let created = store
        .insert("subject-1234")
        .await
        .expect("insert should succeed");

    assert!(created.id > 0);
    assert_eq!(created.uuid, "subject-1234");
    assert_eq!(created.experience, 0);
    assert_eq!(created.level, 0);
    assert_eq!(created.total_score, 0);
    assert_eq!(created.play_count, 0);
    assert_eq!(created.mastery, 0);
    assert_eq!(created.performance_rating, 0);
}

#[tokio::test]
async fn test_ids_are_assigned_once_and_never_reused_between_inserts() {
    let db = common::setup_test_db().await;
    let store = ProfileStore::new(db);

    let first = store.insert("subject-1").await.unwrap();
    let second = store.insert("subject-2").await.unwrap();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_duplicate_subject_is_rejected() {
    let db = common::setup_test_db().await;
    let store = ProfileStore::new(db);

    store.insert("subject-1234").await.unwrap();
    let duplicate = store.insert("subject-1234").await;

    assert!(matches!(duplicate, Err(StorageError::DuplicateSubject(_))));
}

#[tokio::test]
async fn test_find_by_id_returns_the_inserted_profile() {
    let db = common::setup_test_db().await;
    let store = ProfileStore::new(db);

    let created = store.insert("subject-1234").await.unwrap();
    let found = store.find_by_id(created.id).await.expect("profile exists");

    assert_eq!(found, created);
}

#[tokio::test]
async fn test_find_by_unknown_id_reports_not_found() {
    let db = common::setup_test_db().await;
    let store = ProfileStore::new(db);

    let result = store.find_by_id(9999).await;

    assert!(matches!(result, Err(StorageError::NotFound)));
}
