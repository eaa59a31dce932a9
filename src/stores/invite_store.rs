use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::internal::InviteError;
use crate::types::db::invite;

/// Single-use enrollment code ledger.
///
/// The burn operation is the mutual-exclusion point for concurrent
/// registrations presenting the same code: implementations must make it an
/// atomic conditional update, not a read-then-write.
#[async_trait]
pub trait InviteLedger: Send + Sync {
    /// Flip the code to burned, failing if it is missing or already burned.
    async fn burn_if_unburned(&self, code: &str) -> Result<(), InviteError>;

    /// Compensating action: flip a burned code back. Unburning a code that
    /// was never burned is a no-op, not an error.
    async fn unburn(&self, code: &str) -> Result<(), InviteError>;
}

/// Sea-orm backed invite ledger
pub struct InviteStore {
    db: DatabaseConnection,
}

impl InviteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InviteLedger for InviteStore {
    async fn burn_if_unburned(&self, code: &str) -> Result<(), InviteError> {
        // UPDATE invites SET burned = 1 WHERE code = ? AND burned = 0
        // rows_affected == 1 is the only success path; the guard rides on
        // the database's row-level atomicity, so two racing burns cannot
        // both pass.
        let result = invite::Entity::update_many()
            .col_expr(invite::Column::Burned, Expr::value(true))
            .filter(invite::Column::Code.eq(code))
            .filter(invite::Column::Burned.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| InviteError::Database {
                operation: "burn_if_unburned".to_string(),
                source: e,
            })?;

        if result.rows_affected > 0 {
            return Ok(());
        }

        // Nothing flipped: distinguish a consumed code from a missing one
        let existing = invite::Entity::find()
            .filter(invite::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| InviteError::Database {
                operation: "burn_if_unburned".to_string(),
                source: e,
            })?;

        match existing {
            Some(_) => Err(InviteError::AlreadyBurned),
            None => Err(InviteError::NotFound),
        }
    }

    async fn unburn(&self, code: &str) -> Result<(), InviteError> {
        let result = invite::Entity::update_many()
            .col_expr(invite::Column::Burned, Expr::value(false))
            .filter(invite::Column::Code.eq(code))
            .filter(invite::Column::Burned.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| InviteError::Database {
                operation: "unburn".to_string(),
                source: e,
            })?;

        if result.rows_affected > 0 {
            return Ok(());
        }

        let existing = invite::Entity::find()
            .filter(invite::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| InviteError::Database {
                operation: "unburn".to_string(),
                source: e,
            })?;

        match existing {
            // Already unburned; the compensation is idempotent
            Some(_) => {
                tracing::warn!(code, "unburn requested for a code that was not burned");
                Ok(())
            }
            None => Err(InviteError::NotFound),
        }
    }
}
