mod common;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use profiles_backend::errors::internal::InviteError;
use profiles_backend::stores::{InviteLedger, InviteStore};
use profiles_backend::types::db::invite;

async fn burned_flag(db: &sea_orm::DatabaseConnection, code: &str) -> bool {
    invite::Entity::find()
        .filter(invite::Column::Code.eq(code))
        .one(db)
        .await
        .expect("Failed to query invite")
        .expect("Invite should exist")
        .burned
}

#[tokio::test]
async fn test_burn_flips_an_unburned_code() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    let store = InviteStore::new(db.clone());

    store
        .burn_if_unburned("ABC123")
        .await
        .expect("burn should succeed");

    assert!(burned_flag(&db, "ABC123").await);
}

#[tokio::test]
async fn test_second_burn_reports_already_burned() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    let store = InviteStore::new(db.clone());

    store.burn_if_unburned("ABC123").await.unwrap();
    let second = store.burn_if_unburned("ABC123").await;

    assert!(matches!(second, Err(InviteError::AlreadyBurned)));
    assert!(burned_flag(&db, "ABC123").await);
}

#[tokio::test]
async fn test_burn_of_unknown_code_reports_not_found() {
    let db = common::setup_test_db().await;
    let store = InviteStore::new(db);

    let result = store.burn_if_unburned("MISSING").await;

    assert!(matches!(result, Err(InviteError::NotFound)));
}

#[tokio::test]
async fn test_unburn_restores_a_burned_code() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", true).await;
    let store = InviteStore::new(db.clone());

    store.unburn("ABC123").await.expect("unburn should succeed");

    assert!(!burned_flag(&db, "ABC123").await);
    // The code is usable again after compensation
    store
        .burn_if_unburned("ABC123")
        .await
        .expect("reburn should succeed");
}

#[tokio::test]
async fn test_unburn_of_unburned_code_is_a_noop() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    let store = InviteStore::new(db.clone());

    store.unburn("ABC123").await.expect("unburn should be a no-op");

    assert!(!burned_flag(&db, "ABC123").await);
}

#[tokio::test]
async fn test_unburn_of_unknown_code_reports_not_found() {
    let db = common::setup_test_db().await;
    let store = InviteStore::new(db);

    let result = store.unburn("MISSING").await;

    assert!(matches!(result, Err(InviteError::NotFound)));
}

#[tokio::test]
async fn test_burning_one_code_leaves_others_alone() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "FIRST", false).await;
    common::seed_invite(&db, "SECOND", false).await;
    let store = InviteStore::new(db.clone());

    store.burn_if_unburned("FIRST").await.unwrap();

    assert!(burned_flag(&db, "FIRST").await);
    assert!(!burned_flag(&db, "SECOND").await);
}
