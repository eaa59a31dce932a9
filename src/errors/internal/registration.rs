use thiserror::Error;

use super::{IdentityProviderError, InviteError, StorageError};

/// Primary failure classification for the registration saga.
///
/// Compensation failures are never represented here: the saga reports them
/// through tracing and always returns the primary error (see
/// `services::registration_service`).
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Invite code missing or already consumed. Nothing was created, so
    /// there is nothing to compensate.
    #[error("invite code is invalid or already used")]
    InvalidInvite,

    #[error("identity provider failed to provision the account")]
    IdentityProvider(#[from] IdentityProviderError),

    #[error("profile could not be stored")]
    Storage(#[from] StorageError),

    /// The invite ledger itself failed (not a bad code, a broken ledger).
    #[error("invite ledger failure")]
    InviteLedger(#[source] InviteError),
}

impl From<InviteError> for RegistrationError {
    fn from(err: InviteError) -> Self {
        match err {
            InviteError::NotFound | InviteError::AlreadyBurned => RegistrationError::InvalidInvite,
            other => RegistrationError::InviteLedger(other),
        }
    }
}
