use poem_openapi::{payload::Json, ApiResponse};

use super::ErrorResponse;
use crate::errors::internal::LoginFlowError;

/// Error responses for the auth endpoints
///
/// Callback failures deliberately share one generic rejection regardless of
/// which check failed (state, exchange, token, nonce); the classified cause
/// is logged server-side only.
#[derive(ApiResponse, Debug)]
pub enum AuthApiError {
    /// Username or password incorrect
    #[oai(status = 403)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Refresh token rejected by the identity provider
    #[oai(status = 401)]
    RefreshRejected(Json<ErrorResponse>),

    /// Generic rejection for the redirect login flow
    #[oai(status = 404)]
    FlowRejected(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthApiError {
    pub fn invalid_credentials() -> Self {
        AuthApiError::InvalidCredentials(Json(ErrorResponse::new(
            "invalid_credentials",
            "Incorrect username or password",
        )))
    }

    pub fn refresh_rejected() -> Self {
        AuthApiError::RefreshRejected(Json(ErrorResponse::new(
            "refresh_rejected",
            "Identity server rejected the refresh token",
        )))
    }

    pub fn flow_rejected() -> Self {
        AuthApiError::FlowRejected(Json(ErrorResponse::new("not_found", "Not found")))
    }

    pub fn internal_error(message: &str) -> Self {
        AuthApiError::InternalError(Json(ErrorResponse::new("internal_error", message)))
    }
}

impl From<LoginFlowError> for AuthApiError {
    fn from(_err: LoginFlowError) -> Self {
        AuthApiError::flow_rejected()
    }
}
