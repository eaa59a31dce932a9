use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::internal::StorageError;
use crate::types::db::profile;

/// Local profile records keyed by the identity provider's subject id.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Insert a fresh profile for the subject with all counters at zero.
    /// The numeric id is assigned by the store, exactly once.
    async fn insert(&self, subject_id: &str) -> Result<profile::Model, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<profile::Model, StorageError>;
}

/// Sea-orm backed profile repository
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for ProfileStore {
    async fn insert(&self, subject_id: &str) -> Result<profile::Model, StorageError> {
        let new_profile = profile::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            uuid: Set(subject_id.to_string()),
            experience: Set(0),
            level: Set(0),
            total_score: Set(0),
            play_count: Set(0),
            mastery: Set(0),
            performance_rating: Set(0),
        };

        new_profile.insert(&self.db).await.map_err(|e| {
            // The uuid column carries a unique constraint; a duplicate
            // subject is a distinct failure from an unreachable database
            if e.to_string().contains("UNIQUE") {
                StorageError::DuplicateSubject(subject_id.to_string())
            } else {
                StorageError::database("insert", e)
            }
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<profile::Model, StorageError> {
        let found = profile::Entity::find()
            .filter(profile::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| StorageError::database("find_by_id", e))?;

        found.ok_or(StorageError::NotFound)
    }
}
