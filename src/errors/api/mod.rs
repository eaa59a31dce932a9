pub mod auth;
pub mod profile;

pub use auth::AuthApiError;
pub use profile::ProfileApiError;

use poem_openapi::Object;

/// Standardized error body for all API endpoints
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
        }
    }
}
