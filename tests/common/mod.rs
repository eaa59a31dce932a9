// Common test utilities for integration tests

use std::sync::Mutex;

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use profiles_backend::errors::internal::IdentityProviderError;
use profiles_backend::providers::IdentityProvider;
use profiles_backend::types::db::invite;
use profiles_backend::types::internal::auth::{Account, IdTokenClaims, TokenPair};

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Seed an invite row
pub async fn seed_invite(db: &DatabaseConnection, code: &str, burned: bool) {
    invite::ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        code: Set(code.to_string()),
        burned: Set(burned),
    }
    .insert(db)
    .await
    .expect("Failed to seed invite");
}

/// Scripted identity provider for saga integration tests
#[derive(Default)]
pub struct ScriptedIdp {
    pub fail_create: bool,
    pub fail_set_password: bool,
    pub subject_id: String,
    pub deleted: Mutex<Vec<String>>,
}

impl ScriptedIdp {
    pub fn succeeding(subject_id: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdp {
    async fn create_account(
        &self,
        _username: &str,
        _email: &str,
        _enabled: bool,
    ) -> Result<String, IdentityProviderError> {
        if self.fail_create {
            return Err(IdentityProviderError::rejected(
                "create_account",
                409,
                "scripted failure",
            ));
        }
        Ok(self.subject_id.clone())
    }

    async fn set_password(
        &self,
        _subject_id: &str,
        _password: &str,
    ) -> Result<(), IdentityProviderError> {
        if self.fail_set_password {
            return Err(IdentityProviderError::rejected(
                "set_password",
                400,
                "scripted failure",
            ));
        }
        Ok(())
    }

    async fn delete_account(&self, subject_id: &str) -> Result<(), IdentityProviderError> {
        self.deleted.lock().unwrap().push(subject_id.to_string());
        Ok(())
    }

    async fn get_account(&self, subject_id: &str) -> Result<Account, IdentityProviderError> {
        Ok(Account {
            id: subject_id.to_string(),
            username: "alice".to_string(),
            email: Some("a@x.com".to_string()),
            enabled: true,
        })
    }

    async fn password_login(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<TokenPair, IdentityProviderError> {
        Err(IdentityProviderError::rejected(
            "password_login",
            403,
            "not scripted",
        ))
    }

    async fn exchange_code(&self, _code: &str) -> Result<TokenPair, IdentityProviderError> {
        Err(IdentityProviderError::rejected(
            "exchange_code",
            400,
            "not scripted",
        ))
    }

    async fn verify_identity_token(
        &self,
        _raw: &str,
    ) -> Result<IdTokenClaims, IdentityProviderError> {
        Err(IdentityProviderError::InvalidToken("not scripted".to_string()))
    }

    async fn refresh_tokens(
        &self,
        _refresh_token: &str,
    ) -> Result<TokenPair, IdentityProviderError> {
        Err(IdentityProviderError::rejected(
            "refresh_tokens",
            400,
            "not scripted",
        ))
    }
}
