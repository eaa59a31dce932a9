use poem_openapi::{payload::Json, ApiResponse};

use super::ErrorResponse;
use crate::errors::internal::{RegistrationError, StorageError};

/// Error responses for the profile endpoints
///
/// Registration failures stay distinguishable to callers: a bad invite, a
/// provider rejection, and a storage failure each call for a different
/// corrective action.
#[derive(ApiResponse, Debug)]
pub enum ProfileApiError {
    /// Invite code is invalid or already used
    #[oai(status = 401)]
    InvalidInvite(Json<ErrorResponse>),

    /// Identity provider refused to create the account
    #[oai(status = 502)]
    IdentityProvider(Json<ErrorResponse>),

    /// Profile could not be stored or read
    #[oai(status = 500)]
    Storage(Json<ErrorResponse>),

    /// Requested profile does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
}

impl ProfileApiError {
    pub fn invalid_invite() -> Self {
        ProfileApiError::InvalidInvite(Json(ErrorResponse::new(
            "invalid_invite",
            "Invite code is invalid or already used",
        )))
    }

    pub fn identity_provider() -> Self {
        ProfileApiError::IdentityProvider(Json(ErrorResponse::new(
            "identity_provider_error",
            "Identity server failed to create the account",
        )))
    }

    pub fn storage() -> Self {
        ProfileApiError::Storage(Json(ErrorResponse::new(
            "storage_error",
            "Profile database could not be reached",
        )))
    }

    pub fn not_found() -> Self {
        ProfileApiError::NotFound(Json(ErrorResponse::new(
            "not_found",
            "Profile does not exist",
        )))
    }
}

impl From<RegistrationError> for ProfileApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::InvalidInvite => ProfileApiError::invalid_invite(),
            RegistrationError::IdentityProvider(_) => ProfileApiError::identity_provider(),
            RegistrationError::Storage(_) => ProfileApiError::storage(),
            RegistrationError::InviteLedger(_) => ProfileApiError::storage(),
        }
    }
}

impl From<StorageError> for ProfileApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ProfileApiError::not_found(),
            _ => ProfileApiError::storage(),
        }
    }
}
