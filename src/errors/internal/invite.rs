use thiserror::Error;

/// Closed error set for the invite ledger.
///
/// `AlreadyBurned` and `NotFound` are both "invalid invite" to callers of
/// the registration flow, but stay distinct here so the burn operation can
/// report exactly what the conditional update observed.
#[derive(Error, Debug)]
pub enum InviteError {
    #[error("invite code not found")]
    NotFound,

    #[error("invite code was already burned")]
    AlreadyBurned,

    #[error("invite ledger query failed during {operation}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}
