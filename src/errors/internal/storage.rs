use thiserror::Error;

/// Profile store failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("profile not found")]
    NotFound,

    #[error("a profile already exists for subject {0}")]
    DuplicateSubject(String),

    #[error("profile store query failed during {operation}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl StorageError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        StorageError::Database {
            operation: operation.to_string(),
            source,
        }
    }
}
