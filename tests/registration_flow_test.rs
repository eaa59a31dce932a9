// End-to-end registration saga tests against real sea-orm stores and a
// scripted identity provider.

mod common;

use std::sync::Arc;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use common::ScriptedIdp;
use profiles_backend::errors::internal::RegistrationError;
use profiles_backend::services::RegistrationService;
use profiles_backend::stores::{InviteStore, ProfileStore};
use profiles_backend::types::db::{invite, profile};

fn saga(db: &DatabaseConnection, idp: Arc<ScriptedIdp>) -> RegistrationService {
    RegistrationService::new(
        Arc::new(InviteStore::new(db.clone())),
        idp,
        Arc::new(ProfileStore::new(db.clone())),
    )
}

async fn invite_is_burned(db: &DatabaseConnection, code: &str) -> bool {
    invite::Entity::find()
        .filter(invite::Column::Code.eq(code))
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .burned
}

async fn profile_count(db: &DatabaseConnection) -> u64 {
    use sea_orm::PaginatorTrait;
    profile::Entity::find().count(db).await.unwrap()
}

#[tokio::test]
async fn test_successful_registration_creates_profile_and_burns_invite() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    let idp = Arc::new(ScriptedIdp::succeeding("subject-1234"));
    let saga = saga(&db, idp.clone());

    let created = saga
        .register("alice", "a@x.com", "pw", "ABC123")
        .await
        .expect("registration should succeed");

    assert!(created.id > 0);
    assert_eq!(created.uuid, "subject-1234");
    assert!(invite_is_burned(&db, "ABC123").await);
    assert!(idp.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_unburns_invite_and_deletes_account() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    // Pre-existing profile for the same subject forces the insert to fail
    let idp = Arc::new(ScriptedIdp::succeeding("subject-1234"));
    {
        use profiles_backend::stores::ProfileRepository;
        ProfileStore::new(db.clone())
            .insert("subject-1234")
            .await
            .unwrap();
    }
    let saga = saga(&db, idp.clone());

    let result = saga.register("alice", "a@x.com", "pw", "ABC123").await;

    assert!(matches!(result, Err(RegistrationError::Storage(_))));
    assert!(!invite_is_burned(&db, "ABC123").await);
    assert_eq!(
        idp.deleted.lock().unwrap().clone(),
        vec!["subject-1234".to_string()]
    );
    assert_eq!(profile_count(&db).await, 1);
}

#[tokio::test]
async fn test_already_burned_invite_rejects_before_any_side_effect() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", true).await;
    let idp = Arc::new(ScriptedIdp::succeeding("subject-1234"));
    let saga = saga(&db, idp.clone());

    let result = saga.register("alice", "a@x.com", "pw", "ABC123").await;

    assert!(matches!(result, Err(RegistrationError::InvalidInvite)));
    assert!(invite_is_burned(&db, "ABC123").await);
    assert_eq!(profile_count(&db).await, 0);
    assert!(idp.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_rejection_leaves_invite_usable() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    let idp = Arc::new(ScriptedIdp {
        fail_create: true,
        ..ScriptedIdp::succeeding("subject-1234")
    });
    let saga = saga(&db, idp);

    let result = saga.register("alice", "a@x.com", "pw", "ABC123").await;

    assert!(matches!(
        result,
        Err(RegistrationError::IdentityProvider(_))
    ));
    assert!(!invite_is_burned(&db, "ABC123").await);
    assert_eq!(profile_count(&db).await, 0);
}

#[tokio::test]
async fn test_set_password_failure_cleans_up_the_half_made_account() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;
    let idp = Arc::new(ScriptedIdp {
        fail_set_password: true,
        ..ScriptedIdp::succeeding("subject-1234")
    });
    let saga = saga(&db, idp.clone());

    let result = saga.register("alice", "a@x.com", "pw", "ABC123").await;

    assert!(matches!(
        result,
        Err(RegistrationError::IdentityProvider(_))
    ));
    assert!(!invite_is_burned(&db, "ABC123").await);
    assert_eq!(
        idp.deleted.lock().unwrap().clone(),
        vec!["subject-1234".to_string()]
    );
    assert_eq!(profile_count(&db).await, 0);
}

#[tokio::test]
async fn test_invite_becomes_usable_again_after_failed_registration() {
    let db = common::setup_test_db().await;
    common::seed_invite(&db, "ABC123", false).await;

    // First attempt fails at the provider and unwinds
    let failing = Arc::new(ScriptedIdp {
        fail_create: true,
        ..ScriptedIdp::succeeding("subject-1234")
    });
    let result = saga(&db, failing)
        .register("alice", "a@x.com", "pw", "ABC123")
        .await;
    assert!(result.is_err());

    // Second attempt with a healthy provider reuses the same invite
    let healthy = Arc::new(ScriptedIdp::succeeding("subject-5678"));
    let created = saga(&db, healthy)
        .register("alice", "a@x.com", "pw", "ABC123")
        .await
        .expect("retry should succeed");

    assert_eq!(created.uuid, "subject-5678");
    assert!(invite_is_burned(&db, "ABC123").await);
}
